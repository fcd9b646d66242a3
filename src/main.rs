//! ChatShot CLI
//!
//! Usage:
//!   chatshot generate <input> [-o FILE] [-v JSON] [-f FILE] [--width N] [--dark] [--android]
//!   chatshot batch <template> <data> [-o DIR] [--width N] [--dark] [--android]
//!   chatshot example [-o FILE]

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use chatshot::batch::{parse_records, BatchOptions, BatchRunner, RecordFormat};
use chatshot::capture::Capture;
use chatshot::input::{self, Description, Syntax};
use chatshot::template::Variables;
use chatshot::{prepare_screenshot, GenerateOptions, DEFAULT_WIDTH};

#[derive(Parser)]
#[command(name = "chatshot")]
#[command(about = "Generate realistic WhatsApp conversation screenshots")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a screenshot from a conversation file
    Generate {
        /// Input YAML or JSON file
        input: PathBuf,

        /// Output file (default: the description's filename, then output.png)
        #[arg(short, long)]
        output: Option<String>,

        /// JSON string of variables to substitute
        #[arg(short, long)]
        variables: Option<String>,

        /// JSON/YAML file with variables
        #[arg(short = 'f', long)]
        variables_file: Option<PathBuf>,

        /// Screenshot width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Use dark mode
        #[arg(long)]
        dark: bool,

        /// Use Android style (default: iOS)
        #[arg(long)]
        android: bool,
    },

    /// Generate multiple screenshots from JSON/CSV data
    Batch {
        /// Conversation template file
        template: PathBuf,

        /// JSON or CSV file with one variable record per screenshot
        data: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "./output")]
        output_dir: PathBuf,

        /// Screenshot width in pixels
        #[arg(long, default_value_t = DEFAULT_WIDTH)]
        width: u32,

        /// Use dark mode
        #[arg(long)]
        dark: bool,

        /// Use Android style (default: iOS)
        #[arg(long)]
        android: bool,
    },

    /// Write an annotated example conversation file
    Example {
        /// Output file
        #[arg(short, long, default_value = "example.yaml")]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(command: Command) -> chatshot::Result<()> {
    match command {
        Command::Generate {
            input,
            output,
            variables,
            variables_file,
            width,
            dark,
            android,
        } => run_generate(input, output, variables, variables_file, width, dark, android),
        Command::Batch {
            template,
            data,
            output_dir,
            width,
            dark,
            android,
        } => run_batch(template, data, output_dir, width, dark, android),
        Command::Example { output } => run_example(output),
    }
}

fn run_generate(
    input: PathBuf,
    output: Option<String>,
    inline_variables: Option<String>,
    variables_file: Option<PathBuf>,
    width: Option<u32>,
    dark: bool,
    android: bool,
) -> chatshot::Result<()> {
    let text = input::read_input(&input)?;
    let syntax = Syntax::from_path(&input);

    // Caller variables: the file first, inline JSON on top
    let mut variables = Variables::new();
    if let Some(path) = &variables_file {
        let var_text = input::read_input(path)?;
        let file_vars = input::parse_variables(&var_text, Syntax::from_path(path))?;
        variables = input::merge_variables(&variables, &file_vars);
    }
    if let Some(json) = &inline_variables {
        let inline = input::parse_variables(json, Syntax::Json)?;
        variables = input::merge_variables(&variables, &inline);
    }

    let options = GenerateOptions {
        output,
        width,
        dark,
        android,
        variables,
    };

    let prepared = prepare_screenshot(&text, syntax, &options)?;
    println!("Generating screenshot: {}", prepared.output_path.display());

    let capture = Capture::launch(prepared.document.width())?;
    capture.capture(&prepared.document, &prepared.output_path)?;
    capture.close();

    println!("Done: {}", prepared.output_path.display());
    Ok(())
}

fn run_batch(
    template: PathBuf,
    data: PathBuf,
    output_dir: PathBuf,
    width: u32,
    dark: bool,
    android: bool,
) -> chatshot::Result<()> {
    let template_text = input::read_input(&template)?;
    let description = Description::parse(&template_text, Syntax::from_path(&template))?;

    let data_text = input::read_input(&data)?;
    let records = parse_records(&data_text, RecordFormat::from_path(&data))?;

    let runner = BatchRunner::new(
        description,
        records,
        BatchOptions {
            output_dir,
            width,
            dark,
            force_android: android,
        },
    );

    let capture = Capture::launch(width)?;
    let written = runner.run(&capture)?;
    capture.close();

    println!("Done! Generated {} screenshots.", written.len());
    Ok(())
}

fn run_example(output: PathBuf) -> chatshot::Result<()> {
    fs::write(&output, EXAMPLE_CONVERSATION)?;
    println!("Example saved to: {}", output.display());
    println!("Run: chatshot generate {} -o demo.png", output.display());
    Ok(())
}

const EXAMPLE_CONVERSATION: &str = r#"# ChatShot example conversation
# Run: chatshot generate example.yaml -o demo.png

conversation:
  platform: whatsapp
  contact:
    name: "{{contact_name}}"
    phone: "+34 612 345 678"
  messages:
    - from: contact
      text: "Hola, me interesa el asistente de IA"
      time: "10:30"
    - from: me
      text: "¡Hola {{contact_name}}! 👋"
      time: "10:31"
    - from: me
      text: "Claro, te cuento. Nuestro asistente puede responder consultas de clientes 24/7, gestionar citas y mucho más."
      time: "10:31"
    - from: contact
      text: "Suena genial. ¿Cómo funciona?"
      time: "10:32"
    - from: me
      text: "Se integra directamente con WhatsApp Business. Tus clientes chatean normal y el asistente responde al instante."
      time: "10:33"

variables:
  contact_name: "María García"

output:
  filename: "demo-{{contact_name}}.png"
  width: 390
  darkMode: false
"#;
