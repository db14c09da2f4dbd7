use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, AppResult, ShellError};

use super::{CommandOutput, CommandRunner};

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Fail,
}

/// In-memory runner replaying canned output per command.
///
/// Queued replies are consumed first; the last queued reply of a command is
/// repeated once the queue runs dry. Unknown commands print nothing.
#[derive(Debug, Default)]
pub(crate) struct ScriptedRunner {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(self, command: &str, text: &str) -> Self {
        self.push(command, Reply::Text(text.to_owned()));
        self
    }

    pub(crate) fn fail(self, command: &str) -> Self {
        self.push(command, Reply::Fail);
        self
    }

    fn push(&self, command: &str, reply: Reply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.entry(command.to_owned()).or_default().push_back(reply);
        }
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.iter().map(|(command, _)| command.clone()).collect())
            .unwrap_or_default()
    }

    pub(crate) fn count(&self, command: &str) -> usize {
        self.calls().iter().filter(|call| *call == command).count()
    }

    fn next_reply(&self, command: &str) -> Option<Reply> {
        let mut replies = self.replies.lock().ok()?;
        let queue = replies.get_mut(command)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, command: &str, target: &str) -> AppResult<CommandOutput> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((command.to_owned(), target.to_owned()));
        }
        match self.next_reply(command) {
            Some(Reply::Text(stdout)) => Ok(CommandOutput { status: 0, stdout }),
            Some(Reply::Fail) => Err(AppError::shell(ShellError::NonZeroExit {
                command: command.to_owned(),
                status: 1,
                stderr: "scripted failure".to_owned(),
            })),
            None => Ok(CommandOutput {
                status: 0,
                stdout: String::new(),
            }),
        }
    }
}
