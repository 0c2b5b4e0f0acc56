use clap::{App, Arg};
use std::process::exit;
use visualiser_flatfs::Application;

fn main() {
    env_logger::init();

    let arguments = App::new("visualiser-flatfs")
        .version("0.1.0")
        .about("This program shows the files and block usage of a flatfs disk image")
        .arg(
            Arg::with_name("path")
                .takes_value(true)
                .default_value("disk.img")
                .help("The path of the image to open"),
        )
        .get_matches();

    let path = match arguments.value_of("path") {
        Some(p) => p.to_string(),
        None => {
            eprintln!("No path was specified.");
            exit(1);
        }
    };

    let mut application = match Application::new(path) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    };

    match application.run() {
        Ok(_) => (),
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    }
}
