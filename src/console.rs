//! Handling the OptiSim CLI
//!
//! This module handles the command line parsing as well as basic information (e.g. help dialog, version information, etc.).
use std::path::{Path, PathBuf};

use clap::{builder::Str, Parser};

use crate::{
    error::{OptiResult, OptiSimError},
    get_version,
};

/// Validated command line arguments for the OptiSim application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// file path of the optical system, which should be read in
    pub input: PathBuf,
    /// file path of the report
    pub output: PathBuf,
    /// print the report to the console
    pub print: bool,
    /// add the coordinates of the characteristic rays to the report
    pub rays: bool,
    /// add the list of intermediate images to the report
    pub image_list: bool,
    /// write the report in JSON format instead of plain text
    pub json: bool,
}

/// OptiSim - tool for simulating paraxial imaging of thin and thick lenses.
///
/// By default, the optical system is read from `./input.json` and the results are written to `./output.txt`.
#[derive(Parser, Debug)]
#[command(author, version = Str::from(get_version()), about, long_about = None)]
pub struct PartialArgs {
    /// file from which to read the optical system
    #[arg(short, long, default_value = "./input.json")]
    input: String,

    /// file in which to save the output
    #[arg(short, long, default_value = "./output.txt")]
    output: String,

    /// print the parameters of the optical system and the result to the console
    #[arg(short, long)]
    print: bool,

    /// expand the output with the ray coordinates
    #[arg(short, long)]
    rays: bool,

    /// expand the output with the image list
    #[arg(short = 'l', long)]
    imagelist: bool,

    /// write the output as JSON
    #[arg(short, long)]
    json: bool,
}

fn check_input_file(path: &Path) -> OptiResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(OptiSimError::Console(format!(
            "input file {} does not exist",
            path.display()
        )))
    }
}

fn check_output_directory(path: &Path) -> OptiResult<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.is_dir() => Err(OptiSimError::Console(
            format!("output directory {} does not exist", dir.display()),
        )),
        _ => Ok(()),
    }
}

impl TryFrom<PartialArgs> for Args {
    type Error = OptiSimError;

    fn try_from(part_args: PartialArgs) -> OptiResult<Self> {
        let input = PathBuf::from(part_args.input);
        check_input_file(&input)?;
        let output = PathBuf::from(part_args.output);
        check_output_directory(&output)?;
        Ok(Self {
            input,
            output,
            print: part_args.print,
            rays: part_args.rays,
            image_list: part_args.imagelist,
            json: part_args.json,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_matches::assert_matches;
    const FIXTURE: &str = "./files_for_testing/json/two_lenses.json";
    #[test]
    fn parse_defaults() {
        let part_args = PartialArgs::try_parse_from(["optisim"]).unwrap();
        assert_eq!(part_args.input, "./input.json");
        assert_eq!(part_args.output, "./output.txt");
        assert!(!part_args.print);
        assert!(!part_args.rays);
        assert!(!part_args.imagelist);
        assert!(!part_args.json);
    }
    #[test]
    fn parse_flags() {
        let part_args =
            PartialArgs::try_parse_from(["optisim", "-i", FIXTURE, "-o", "out.txt", "-p", "-r", "-l"])
                .unwrap();
        let args = Args::try_from(part_args).unwrap();
        assert_eq!(args.input, PathBuf::from(FIXTURE));
        assert_eq!(args.output, PathBuf::from("out.txt"));
        assert!(args.print);
        assert!(args.rays);
        assert!(args.image_list);
        assert!(!args.json);
        let part_args = PartialArgs::try_parse_from([
            "optisim",
            "--input",
            FIXTURE,
            "--imagelist",
            "--json",
        ])
        .unwrap();
        let args = Args::try_from(part_args).unwrap();
        assert!(args.image_list);
        assert!(args.json);
    }
    #[test]
    fn parse_unknown_flag() {
        assert!(PartialArgs::try_parse_from(["optisim", "-x"]).is_err());
    }
    #[test]
    fn missing_input_file() {
        let part_args =
            PartialArgs::try_parse_from(["optisim", "-i", "./files_for_testing/json/missing.json"])
                .unwrap();
        assert_matches!(Args::try_from(part_args), Err(OptiSimError::Console(_)));
    }
    #[test]
    fn missing_output_directory() {
        let part_args = PartialArgs::try_parse_from([
            "optisim",
            "-i",
            FIXTURE,
            "-o",
            "./no_such_directory/output.txt",
        ])
        .unwrap();
        assert_matches!(Args::try_from(part_args), Err(OptiSimError::Console(_)));
    }
}
