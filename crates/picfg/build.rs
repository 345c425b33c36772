use clap::CommandFactory;

#[path = "src/cli.rs"]
mod cli;

// Man pages for `picfg` and each subcommand land in $OUT_DIR/man.
fn main() -> std::io::Result<()> {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let Some(out_dir) = std::env::var_os("OUT_DIR") else {
        return Ok(());
    };
    let man_dir = std::path::Path::new(&out_dir).join("man");
    std::fs::create_dir_all(&man_dir)?;

    clap_mangen::generate_to(cli::Cli::command(), &man_dir)
}
