const PRETTY_ENV: &str = "RUST_LOG_PRETTY";

fn main() {
    println!("cargo::rustc-check-cfg=cfg(tracing_pretty)");
    println!("cargo::rerun-if-env-changed={PRETTY_ENV}");

    let pretty = std::env::var(PRETTY_ENV).unwrap_or_default();
    if matches!(pretty.as_str(), "1" | "true") {
        println!("cargo::rustc-cfg=tracing_pretty");
    }
}
