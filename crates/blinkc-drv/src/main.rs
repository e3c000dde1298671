use blinkc_drv::Config;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(config) = Config::from_args(args) else {
        eprintln!("Use: cc <source_file>");
        std::process::exit(1);
    };
    std::process::exit(blinkc_drv::run(&config));
}
