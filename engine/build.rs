fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=proto/dashboard.proto");
    // Fall back to the bundled protoc when none is configured on the host.
    if std::env::var_os("PROTOC").is_none() {
        std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    }
    tonic_build::configure()
        .build_server(true)
        .build_client(true) // The GUI talks to the engine through the generated client.
        .compile(&["proto/dashboard.proto"], &["proto"])?;
    Ok(())
}
