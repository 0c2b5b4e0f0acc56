use clap::{App, Arg};
use flatfs_tool_lib::{format_image, sized_string_to_u64, u64_to_sized_string};
use std::process::exit;

fn main() {
    env_logger::init();

    let arguments = App::new("mkimage-flatfs")
        .version("0.1.0")
        .about("This program creates and formats a flatfs disk image.")
        .arg(
            Arg::with_name("image")
                .required(true)
                .takes_value(true)
                .help("The path of the image to create"),
        )
        .arg(
            Arg::with_name("size")
                .required(true)
                .takes_value(true)
                .help("The size of the image, e.g. 1MiB or 65536"),
        )
        .get_matches();

    let path = match arguments.value_of("image") {
        Some(p) => p,
        None => {
            eprintln!("An image is required.");
            exit(1);
        }
    };

    let size = match arguments.value_of("size").and_then(sized_string_to_u64) {
        Some(s) => s,
        None => {
            eprintln!("Could not understand the size.");
            exit(1);
        }
    };

    let fs = match format_image(path, size) {
        Ok(fs) => fs,
        Err(e) => {
            eprintln!("Failed to format {}: {}", path, e);
            exit(1);
        }
    };

    let info = fs.disk_info();

    println!(
        "Formatted {} ({}): {} blocks, {} free for data.",
        path,
        u64_to_sized_string(size),
        info.total_blocks(),
        u64_to_sized_string(info.free_block_space())
    );
}
