fn main() {
    #[cfg(feature = "cli")]
    revdiff::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("revdiff: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
