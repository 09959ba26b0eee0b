// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn delta_arg() -> Arg {
    Arg::new("delta")
        .long("delta")
        .value_name("N")
        .default_value("5")
        .help("Package pool growth increment")
}

fn paths_arg() -> Arg {
    Arg::new("paths")
        .required(true)
        .num_args(1..)
        .help("Candidate sources (.rpm files or .json manifests)")
}

fn build_cli() -> Command {
    Command::new("rpmal")
        .version(env!("CARGO_PKG_VERSION"))
        .author("RPMAL Contributors")
        .about("Find which install candidates satisfy package dependencies")
        .subcommand_required(false)
        .subcommand(
            Command::new("check")
                .about("Check that every candidate's requirements are satisfied by the candidate set")
                .arg(paths_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the report as JSON"),
                )
                .arg(delta_arg()),
        )
        .subcommand(
            Command::new("whatprovides")
                .about("List candidates satisfying a dependency")
                .arg(
                    Arg::new("dependency")
                        .required(true)
                        .help("Dependency, e.g. \"foo >= 1.0\" or /usr/bin/tool"),
                )
                .arg(paths_arg())
                .arg(
                    Arg::new("color")
                        .short('c')
                        .long("color")
                        .default_value("0")
                        .help("Query color bits (0 accepts any color)"),
                )
                .arg(delta_arg()),
        )
        .subcommand(
            Command::new("vercmp")
                .about("Compare two epoch:version-release strings")
                .arg(Arg::new("a").required(true).help("First EVR"))
                .arg(Arg::new("b").required(true).help("Second EVR")),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory
    let out_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).expect("Failed to create man directory");

    // Generate main man page
    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();
    man.render(&mut buffer)
        .expect("Failed to render man page");

    let man_path = man_dir.join("rpmal.1");
    fs::write(&man_path, buffer).expect("Failed to write man page");
}
