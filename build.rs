use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=config.json");
    println!("cargo:rerun-if-changed=config.json.example");

    // Embed the site configuration if one has been written next to the
    // manifest; otherwise fall back to the checked-in template so the crate
    // always builds.
    let root = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap_or_default());
    let site = root.join("config.json");
    let config = if site.exists() {
        site
    } else {
        println!("cargo:warning=config.json not found, embedding config.json.example");
        root.join("config.json.example")
    };
    println!("cargo:rustc-env=DOORSENSOR_CONFIG={}", config.display());

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
