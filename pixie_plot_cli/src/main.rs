use clap::{Arg, ArgAction, Command};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::mpsc::channel;

use libpixie_plot::config::{AxisLimits, PlotConfig};
use libpixie_plot::csv_data::CsvFrame;
use libpixie_plot::error::{CsvFrameError, ProcessorError};
use libpixie_plot::event_table::EventTable;
use libpixie_plot::plot::{render_columns, render_energy_grid, PlotKind};
use libpixie_plot::process::process_list_mode_file;
use libpixie_plot::worker_status::WorkerStatus;

/// Clap-compatible wrapper around the AxisLimits parser
fn parse_xlim(value: &str) -> Result<AxisLimits, String> {
    AxisLimits::from_str(value).map_err(|error| error.to_string())
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn build_command() -> Command {
    Command::new("pixie_plot_cli")
        .about("Plot Pixie-16 acquisition data from a pre-decoded CSV or a raw list-mode binary")
        .arg(
            Arg::new("baseline")
                .short('b')
                .long("baseline")
                .action(ArgAction::SetTrue)
                .help("Plots baselines"),
        )
        .arg(
            Arg::new("chan")
                .short('c')
                .long("chan")
                .value_parser(clap::value_parser!(usize))
                .help("The channel that you'd like to plot"),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("The file containing the data to read"),
        )
        .arg(
            Arg::new("freq")
                .long("freq")
                .value_parser(clap::value_parser!(u32))
                .help("The sampling frequency used to collect list-mode data. Ex. 250"),
        )
        .arg(
            Arg::new("lmd")
                .short('l')
                .long("lmd")
                .action(ArgAction::SetTrue)
                .help("Tells the program that the file is list-mode data"),
        )
        .arg(
            Arg::new("mca")
                .short('m')
                .long("mca")
                .action(ArgAction::SetTrue)
                .help("Plots MCA spectra"),
        )
        .arg(
            Arg::new("xlim")
                .short('x')
                .long("xlim")
                .value_parser(parse_xlim)
                .help("Comma separated range for X-axis limits. Ex. 10,400"),
        )
        .arg(
            Arg::new("rev")
                .long("rev")
                .value_parser(clap::value_parser!(u32))
                .help("The firmware used to collect list-mode data. Ex. 30474"),
        )
        .arg(
            Arg::new("trace")
                .short('t')
                .long("trace")
                .action(ArgAction::SetTrue)
                .help("Plots traces"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value(".")
                .help("Directory that rendered plots are written into"),
        )
        .arg(
            Arg::new("dump")
                .short('d')
                .long("dump")
                .action(ArgAction::SetTrue)
                .help("Also write the decoded list-mode table as events.csv in the output directory"),
        )
        .arg(
            Arg::new("workers")
                .short('w')
                .long("workers")
                .value_parser(clap::value_parser!(usize))
                .help("Number of decode workers. Defaults to the available parallelism"),
        )
}

/// Run the list-mode pipeline on its own thread while this one draws
/// per-worker progress bars from the status channel
fn run_list_mode(
    config: &PlotConfig,
    pb_manager: &MultiProgress,
) -> Result<EventTable, ProcessorError> {
    let (tx, rx) = channel();
    let thread_config = config.clone();
    let handle = std::thread::spawn(move || process_list_mode_file(&thread_config, &tx));

    let mut bars: HashMap<usize, ProgressBar> = HashMap::new();
    // The channel disconnects once the processing thread drops its sender
    while let Ok(status) = rx.recv() {
        update_bar(pb_manager, &mut bars, status);
    }
    for bar in bars.values() {
        bar.finish();
    }

    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(ProcessorError::WorkerPanic),
    }
}

fn update_bar(
    pb_manager: &MultiProgress,
    bars: &mut HashMap<usize, ProgressBar>,
    status: WorkerStatus,
) {
    let bar = bars.entry(status.worker_id).or_insert_with(|| {
        let bar = pb_manager.add(ProgressBar::new(100));
        bar.set_prefix(format!("Worker {}", status.worker_id));
        if let Ok(style) = ProgressStyle::with_template("{prefix} {bar:40.cyan/blue} {pos:>3}%") {
            bar.set_style(style);
        }
        bar
    });
    bar.set_position((status.progress * 100.0) as u64);
}

/// Write the decoded table (minus traces) next to the rendered plots
fn dump_events(table: &EventTable, output_dir: &Path) -> Result<(), CsvFrameError> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join("events.csv");
    let file = std::fs::File::create(&path)?;
    table.write_csv(file)?;
    log::info!("Wrote decoded event table to {}", path.to_string_lossy());
    Ok(())
}

fn main() {
    // Create a cli
    let mut cmd = build_command();
    let matches = cmd.clone().get_matches();

    // Initialize feedback
    let logger = simplelog::TermLogger::new(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );

    let pb_manager = MultiProgress::new();

    LogWrapper::new(pb_manager.clone(), logger)
        .try_init()
        .expect("Could not create logging/progress!");

    // Parse the cli
    let config = PlotConfig {
        file: matches
            .get_one::<PathBuf>("file")
            .expect("We require a file arg")
            .clone(),
        output_dir: matches
            .get_one::<PathBuf>("output")
            .expect("Output has a default")
            .clone(),
        channel: matches.get_one::<usize>("chan").copied(),
        xlim: matches.get_one::<AxisLimits>("xlim").copied(),
        list_mode: matches.get_flag("lmd"),
        frequency: matches.get_one::<u32>("freq").copied(),
        revision: matches.get_one::<u32>("rev").copied(),
        n_workers: matches
            .get_one::<usize>("workers")
            .copied()
            .unwrap_or_else(default_workers),
    };

    if let Err(error) = config.validate() {
        cmd.error(
            clap::error::ErrorKind::MissingRequiredArgument,
            error.to_string(),
        )
        .exit();
    }

    log::info!("Data file: {}", config.file.to_string_lossy());
    log::info!("Output directory: {}", config.output_dir.to_string_lossy());

    let mut requested: Vec<PlotKind> = Vec::new();
    if matches.get_flag("trace") {
        requested.push(PlotKind::Trace);
    }
    if matches.get_flag("mca") {
        requested.push(PlotKind::Mca);
    }
    if matches.get_flag("baseline") {
        requested.push(PlotKind::Baseline);
    }

    if config.list_mode {
        let table = match run_list_mode(&config, &pb_manager) {
            Ok(table) => table,
            Err(error) => {
                log::error!("Decoding failed with error: {error}");
                std::process::exit(1);
            }
        };
        if matches.get_flag("dump") {
            if let Err(error) = dump_events(&table, &config.output_dir) {
                log::error!("Writing events.csv failed with error: {error}");
                std::process::exit(1);
            }
        }
        if let Err(error) = render_energy_grid(&table, config.xlim.as_ref(), &config.output_dir) {
            log::error!("Plotting failed with error: {error}");
            std::process::exit(1);
        }
        if !requested.is_empty() {
            log::warn!(
                "Trace/MCA/baseline plots need a pre-decoded CSV; skipping them for list-mode input."
            );
        }
    } else {
        if matches.get_flag("dump") {
            log::warn!("The input is already a CSV; ignoring --dump.");
        }
        let frame = match CsvFrame::from_path(&config.file) {
            Ok(frame) => frame,
            Err(error) => {
                log::error!("Loading CSV failed with error: {error}");
                std::process::exit(1);
            }
        };
        if requested.is_empty() {
            log::warn!("No plot requested; use -t, -m, or -b to pick one.");
        }
        for kind in requested {
            let result = if kind == PlotKind::Baseline {
                // Baselines carry a timestamp column that should not be drawn
                let mut baseline_frame = frame.clone();
                baseline_frame.drop_column("timestamp");
                render_columns(
                    &baseline_frame,
                    kind,
                    config.channel,
                    config.xlim.as_ref(),
                    &config.output_dir,
                )
            } else {
                render_columns(
                    &frame,
                    kind,
                    config.channel,
                    config.xlim.as_ref(),
                    &config.output_dir,
                )
            };
            if let Err(error) = result {
                log::error!("Plotting failed with error: {error}");
                std::process::exit(1);
            }
        }
    }

    log::info!("Done.");
}
