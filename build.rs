use clap_mangen::Man;

include!("src/args.rs");

fn main() -> std::io::Result<()> {
    println!("cargo:rerun-if-changed=src/args.rs");

    let cmd = command_builder();

    let man = Man::new(cmd);
    let mut buffer: Vec<u8> = Default::default();
    man.render(&mut buffer)?;

    let man_dir = std::path::PathBuf::from(
        std::env::var_os("CARGO_MANIFEST_DIR").ok_or(std::io::ErrorKind::NotFound)?,
    )
    .join("man");

    if !man_dir.is_dir() {
        std::fs::create_dir_all(&man_dir)?;
    }

    std::fs::write(man_dir.join("pkgstat.1"), buffer)?;

    Ok(())
}
