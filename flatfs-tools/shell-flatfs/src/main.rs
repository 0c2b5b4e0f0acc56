mod command;
mod session;

use clap::{App, Arg};
use command::Command;
use log::warn;
use session::Session;
use std::io::{self, BufRead, Write};

fn main() {
    env_logger::init();

    let arguments = App::new("shell-flatfs")
        .version("0.1.0")
        .about("An interactive shell for flatfs disk images.")
        .arg(
            Arg::with_name("image")
                .takes_value(true)
                .help("An image to mount on startup"),
        )
        .get_matches();

    let mut session = Session::new();

    println!("FlatFS interactive shell. Type 'help' for commands.");

    if let Some(image) = arguments.value_of("image") {
        report(session.execute(&Command::Mount {
            image: image.to_string(),
        }));
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("flatfs> ");
        if let Err(e) = io::stdout().flush() {
            warn!("could not flush the prompt: {}", e);
        }

        let line = match lines.next() {
            Some(Ok(l)) => l,
            Some(Err(e)) => {
                eprintln!("Failed to read input: {}", e);
                break;
            }
            None => break,
        };

        match Command::parse(&line) {
            Ok(Some(Command::Exit)) => break,
            Ok(Some(command)) => report(session.execute(&command)),
            Ok(None) => (),
            Err(message) => eprintln!("{}", message),
        }
    }
}

fn report(result: Result<String, String>) {
    match result {
        Ok(text) => println!("{}", text),
        Err(message) => eprintln!("{}", message),
    }
}
