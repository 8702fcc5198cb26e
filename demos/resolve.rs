use mek_resolve::{BuildContext, BuildMode, Loader};

fn main() -> Result<(), mek_resolve::Error> {
    for mode in [BuildMode::Debug, BuildMode::Release] {
        let ctx = BuildContext::builder()
            .with_loader(
                Loader::builder()
                    .with_manifest("demos/mek.toml", true)
                    .with_manifest("demos/mek.local.toml", false),
            )?
            .with_mode(mode)
            .build()?;

        let resolved = ctx.resolved();
        println!(
            "[{mode}] {} {}",
            resolved.compiler(),
            resolved.compile_args().join(" ")
        );
    }

    Ok(())
}
