use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use labelsheet::{LabelStyles, PageGeometry, SystemOpener};

#[derive(Parser)]
#[command(version, about = "Render an XLSX address list onto A4 mailing-label PDFs")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Generate the label PDF from the address workbook
    Generate {
        /// Address workbook (columns: 이름, 직분, 교회, 주소, 우편번호)
        #[arg(short, long, default_value = "members.xlsx")]
        input: PathBuf,
        /// Where to write the PDF
        #[arg(short, long, default_value = "labels_output.pdf")]
        output: PathBuf,
        /// Font family for the label text
        #[arg(long, default_value = "NanumGothic")]
        font: String,
    },
    /// Open a previously generated PDF in the system viewer for printing
    Print {
        /// The generated PDF
        #[arg(short, long, default_value = "labels_output.pdf")]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Cmd::Generate {
            input,
            output,
            font,
        } => {
            let styles = LabelStyles {
                font_family: font,
                ..LabelStyles::default()
            };
            labelsheet::generate_labels_with(
                &input,
                &output,
                &PageGeometry::a4_label_14(),
                &styles,
            )
            .map(|()| println!("Wrote {}", output.display()))
        }
        Cmd::Print { output } => {
            labelsheet::dispatch_artifact(&SystemOpener, &output)
                .map(|()| println!("Opened {} for printing", output.display()))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
