use std::env;

fn main() {
    // 告诉 cargo 在 build.rs 变化时重新运行
    println!("cargo:rerun-if-changed=build.rs");

    // 主机测试 (cargo test) 不需要链接脚本
    let target_arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    if target_arch != "xtensa" {
        return;
    }

    // esp-hal 1.0 提供 linkall.x, 只作用于固件二进制
    println!("cargo:rustc-link-arg-bins=-Tlinkall.x");

    if env::var_os("CARGO_FEATURE_LOG_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }
}
