use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use gesturelab::assemblers::DiscreteAssembler;
use gesturelab::classifier::{dataset, Classifier, NearestCentroidClassifier};
use gesturelab::consumers::{CallbackManager, ClassifierPredictor, FileRecorder, Predictor};
use gesturelab::engine::{self, PipelineBuilder};
use gesturelab::hal::serial::{self, DEFAULT_BAUD_RATE, DEFAULT_SERIAL_TIMEOUT};
use gesturelab::hal::{FrameDispatcher, LineProtocol, LineStreamSource};
use gesturelab::observability::PipelineMonitor;
use gesturelab::registry;
use log::info;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(
    name = "gesturelab",
    version,
    about = "Segment sensor frame streams into gesture samples"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a line-protocol capture through a JSON pipeline
    Run(RunArgs),
    /// Save every batch of a capture as a labeled sample file
    Record(RecordArgs),
    /// Train a nearest-centroid model on a directory of samples
    Train(TrainArgs),
    /// Print the registered stage types as JSON
    Stages,
    /// List the serial ports present on this machine
    Ports,
    /// Print raw protocol lines as they arrive
    Monitor(InputArgs),
}

#[derive(Args)]
struct InputArgs {
    /// Serial port the device is attached to
    #[arg(long, conflicts_with = "input")]
    port: Option<String>,

    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    baud: u32,

    /// Capture file; stdin when neither this nor --port is given
    #[arg(long)]
    input: Option<PathBuf>,

    /// Emit TIMEOUT when a line takes longer than this many milliseconds
    /// (one second by default on a serial port)
    #[arg(long)]
    read_timeout_ms: Option<u64>,
}

impl InputArgs {
    fn read_timeout(&self) -> Option<Duration> {
        match (self.read_timeout_ms, &self.port) {
            (Some(ms), _) => Some(Duration::from_millis(ms)),
            (None, Some(_)) => Some(DEFAULT_SERIAL_TIMEOUT),
            (None, None) => None,
        }
    }

    async fn open(&self) -> Result<Box<dyn AsyncBufRead + Unpin + Send>> {
        if let Some(port) = &self.port {
            return Ok(Box::new(serial::open_port(port, self.baud)?));
        }
        match &self.input {
            Some(path) => {
                let file = tokio::fs::File::open(path)
                    .await
                    .with_context(|| format!("Failed to open {}", path.display()))?;
                Ok(Box::new(BufReader::new(file)))
            }
            None => Ok(Box::new(BufReader::new(tokio::io::stdin()))),
        }
    }
}

#[derive(Args)]
struct RunArgs {
    /// Pipeline description
    #[arg(long)]
    config: PathBuf,

    /// Trained model; every sample reaching the last stage is classified
    #[arg(long)]
    model: Option<PathBuf>,

    /// Also save the samples reaching the last stage into this directory
    #[arg(long, requires = "gesture_id")]
    record_dir: Option<PathBuf>,

    /// Label for the samples saved with --record-dir
    #[arg(long)]
    gesture_id: Option<String>,

    #[command(flatten)]
    input: InputArgs,
}

#[derive(Args)]
struct RecordArgs {
    /// Label written into every saved sample
    #[arg(long)]
    gesture_id: String,

    /// Existing directory the samples are saved to
    #[arg(long)]
    target_dir: PathBuf,

    /// Values per frame
    #[arg(long, default_value_t = 6)]
    axes: usize,

    #[command(flatten)]
    input: InputArgs,
}

#[derive(Args)]
struct TrainArgs {
    /// Directory of recorded samples
    #[arg(long)]
    dataset: PathBuf,

    /// Where to write the trained model
    #[arg(long)]
    model: PathBuf,

    /// Frames every sample is rescaled to before comparison
    #[arg(long, default_value_t = 50)]
    frames: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    match cli.command {
        Command::Run(args) => run(args).await,
        Command::Record(args) => record(args).await,
        Command::Train(args) => train(args),
        Command::Stages => {
            println!("{}", serde_json::to_string_pretty(&registry::all_stages())?);
            Ok(())
        }
        Command::Ports => {
            for port in serial::available_ports()? {
                println!("{}\t{}", port.name, port.kind);
            }
            Ok(())
        }
        Command::Monitor(args) => monitor(args).await,
    }
}

async fn run(args: RunArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.config)
        .with_context(|| format!("Failed to read {}", args.config.display()))?;
    let config: serde_json::Value = serde_json::from_str(&text)?;
    let mut builder = PipelineBuilder::from_json(config)?;

    if let Some(path) = &args.model {
        let mut classifier = NearestCentroidClassifier::default();
        classifier
            .load(path)
            .with_context(|| format!("Failed to load model from {}", path.display()))?;
        let mut manager = CallbackManager::new();
        manager.set_default_callback(|gesture_id| {
            info!("gesture: {}", gesture_id);
            println!("{}", gesture_id);
        });
        let predictor = Predictor::new(ClassifierPredictor::new(classifier)).with_receiver(manager);
        builder = builder.with_terminal_sink(predictor);
    }
    if let (Some(dir), Some(gesture_id)) = (&args.record_dir, &args.gesture_id) {
        let recorder = FileRecorder::new(dir)?.with_forced_gesture_id(gesture_id.clone());
        builder = builder.with_terminal_sink(recorder);
    }

    let pipeline = builder.build()?;
    let monitor = PipelineMonitor::new(pipeline.metrics().clone());
    let protocol = LineProtocol::new(Some(pipeline.axes()));

    let mut dispatcher = FrameDispatcher::new();
    dispatcher.attach(pipeline);
    replay(&args.input, protocol, &mut dispatcher).await?;

    println!("{}", monitor.generate_report());
    Ok(())
}

async fn record(args: RecordArgs) -> Result<()> {
    let recorder =
        FileRecorder::new(&args.target_dir)?.with_forced_gesture_id(args.gesture_id.clone());
    let mut assembler = DiscreteAssembler::new(args.axes);
    assembler.attach(recorder);

    let mut dispatcher = FrameDispatcher::new();
    dispatcher.attach(assembler);
    replay(&args.input, LineProtocol::new(Some(args.axes)), &mut dispatcher).await?;

    info!("recording of '{}' finished", args.gesture_id);
    Ok(())
}

fn train(args: TrainArgs) -> Result<()> {
    let samples = dataset::load_dir(&args.dataset)
        .with_context(|| format!("Failed to load dataset from {}", args.dataset.display()))?;
    for (gesture_id, count) in dataset::count_by_gesture(&samples) {
        println!("{}: {} sample(s)", gesture_id, count);
    }

    let mut classifier = NearestCentroidClassifier::new(args.frames);
    let score = classifier.train(&samples)?;
    classifier.save(&args.model)?;
    println!("Training score: {:.3}", score);
    Ok(())
}

async fn monitor(args: InputArgs) -> Result<()> {
    let mut lines = args.open().await?.lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => println!("{}", line),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}

/// Drive the input to the end (or Ctrl-C), then flush the listeners
async fn replay(
    input: &InputArgs,
    protocol: LineProtocol,
    dispatcher: &mut FrameDispatcher,
) -> Result<()> {
    let mut source = LineStreamSource::new(input.open().await?, protocol);
    if let Some(read_timeout) = input.read_timeout() {
        source = source.with_read_timeout(read_timeout);
    }

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    let summary = engine::drive_until(&mut source, dispatcher, shutdown).await?;
    dispatcher.finish();

    info!(
        "replayed {} events{}",
        summary.events(),
        if summary.interrupted { " (interrupted)" } else { "" }
    );
    Ok(())
}
