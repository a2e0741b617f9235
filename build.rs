use std::env;

use vergen_gix::{BuildBuilder, CargoBuilder, Emitter, GixBuilder, RustcBuilder, SysinfoBuilder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let build = BuildBuilder::default().build_timestamp(true).build()?;
    let cargo = CargoBuilder::default()
        .target_triple(true)
        .opt_level(true)
        .build()?;
    let gix = GixBuilder::default()
        .sha(true)
        .commit_timestamp(true)
        .dirty(true)
        .build()?;
    let rustc = RustcBuilder::default().semver(true).channel(true).build()?;
    let si = SysinfoBuilder::default().build()?;

    Emitter::default()
        .add_instructions(&build)?
        .add_instructions(&cargo)?
        .add_instructions(&gix)?
        .add_instructions(&rustc)?
        .add_instructions(&si)?
        .emit()?;

    link_libfli();

    Ok(())
}

/// Link the vendor focuser library when the hardware backend is enabled.
fn link_libfli() {
    println!("cargo:rerun-if-env-changed=LIBFLI_DIR");
    if env::var("CARGO_FEATURE_LIBFLI").is_err() {
        return;
    }

    if let Ok(dir) = env::var("LIBFLI_DIR") {
        println!("cargo:rustc-link-search=native={dir}");
    }
    println!("cargo:rustc-link-lib=fli");
    // libfli on Linux pulls in libm for its temperature conversions.
    println!("cargo:rustc-link-lib=m");
}
