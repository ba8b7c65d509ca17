use clap::Parser;
use env_logger::Env;
use log::info;
use optisim::{
    console::{Args, PartialArgs},
    error::{OptiResult, OptiSimError},
    reporter::AnalysisReport,
    OpticalSystem,
};
use std::{fs::File, io::Write, path::Path};

fn create_report_file(path: &Path, content: &str) -> OptiResult<()> {
    let mut output = File::create(path)
        .map_err(|e| OptiSimError::Io(format!("report file creation failed: {e}")))?;
    write!(output, "{content}")
        .map_err(|e| OptiSimError::Io(format!("writing report file failed: {e}")))?;
    info!("report written to {}", path.display());
    Ok(())
}

fn main() -> OptiResult<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    //parse CLI arguments
    let args = Args::try_from(PartialArgs::parse())?;

    //read the optical system from file
    let mut system = OpticalSystem::from_file(&args.input)?;

    //calculate the image and assemble the report
    let mut report = AnalysisReport::new(&mut system)?;
    if args.image_list {
        report.add_image_sequence(&system)?;
    }
    if args.rays {
        report.add_rays(&system)?;
    }
    let content = if args.json {
        report.to_json_string()?
    } else {
        report.to_string()
    };
    create_report_file(&args.output, &content)?;
    if args.print {
        print!("{report}");
    }
    Ok(())
}
