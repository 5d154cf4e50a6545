use std::env::consts;

pub struct Version;

impl Version {
    pub fn print() {
        println!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        println!("{}", env!("CARGO_PKG_DESCRIPTION"));
        println!();
        println!("Target:     {}-{}", consts::ARCH, consts::OS);
        println!("Build date: {}", env!("BUILD_DATE"));
        #[cfg(debug_assertions)]
        println!("Profile:    debug");
        #[cfg(not(debug_assertions))]
        println!("Profile:    release");
    }
}
