fn main() {
    use graphdeps::cli::parse;
    let cli = parse();
    graphdeps::utils::logging::init(cli.quiet, cli.verbose);
    let code = graphdeps::app::run_cli(cli);
    if code != 0 {
        std::process::exit(code);
    }
}
