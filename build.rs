#[cfg(target_os = "windows")]
fn main() {
    use winresource::WindowsResource;

    let mut res = WindowsResource::new();
    if std::path::Path::new("res/rhours.ico").exists() {
        res.set_icon("res/rhours.ico");
    }
    res.set("FileDescription", "rHours CLI")
        .set("ProductName", "rHours")
        .set("OriginalFilename", "rhours.exe")
        .set("FileVersion", env!("CARGO_PKG_VERSION"))
        .set("ProductVersion", env!("CARGO_PKG_VERSION"))
        .compile()
        .expect("Failed to embed version resource");
}

#[cfg(not(target_os = "windows"))]
fn main() {}
