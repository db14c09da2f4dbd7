pub const ATRACE_START: &str = "atrace gfx input --async_start";
pub const ATRACE_STOP: &str = "atrace gfx input --async_stop";
pub const PROP_API_LEVEL: &str = "ro.build.version.sdk";
pub const PROP_PRODUCT_MODEL: &str = "ro.product.model";

#[must_use]
pub fn gfxinfo_reset(package: &str) -> String {
    format!("dumpsys gfxinfo {} reset", package)
}

#[must_use]
pub fn gfxinfo_dump(package: &str) -> String {
    format!("dumpsys gfxinfo {}", package)
}

#[must_use]
pub fn getprop(name: &str) -> String {
    format!("getprop {}", name)
}
