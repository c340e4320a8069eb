// build.rs
fn main() {
    // Only compile the resource for Windows targets
    if std::env::var("CARGO_CFG_TARGET_OS").unwrap() == "windows" {
        let mut res = winresource::WindowsResource::new();

        // File properties visible in Windows "Properties -> Details"
        res.set("ProductName", "nvtfix");
        res.set(
            "FileDescription",
            "Neuralynx NVT zero-position fixer",
        );

        if let Err(e) = res.compile() {
            println!("cargo:warning=Failed to compile windows resource: {}", e);
        }
    }
}
