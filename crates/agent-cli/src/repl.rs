//! Interactive query loop

use agent_invest::{PipelineOrchestrator, ReportSink};
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Minimum accepted query length, in characters
const MIN_QUERY_CHARS: usize = 5;

const GOODBYE: &str = "\n👋 Thank you for using the Investment Analyst AI!";
const CANCELLED: &str = "\n👋 Operation cancelled by user. Goodbye!";

/// What a line of user input asks for
#[derive(Debug, PartialEq, Eq)]
pub enum Input<'a> {
    Exit,
    TooShort,
    Query(&'a str),
}

pub fn classify_input(line: &str) -> Input<'_> {
    let input = line.trim();
    if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
        Input::Exit
    } else if input.chars().count() < MIN_QUERY_CHARS {
        Input::TooShort
    } else {
        Input::Query(input)
    }
}

pub fn print_banner() {
    let rule = "=".repeat(80);
    println!("\n💼 INVESTMENT ANALYST AI");
    println!("{rule}");
    println!("This system provides comprehensive investment analysis using:");
    println!("- An LLM (Groq by default) for financial reasoning");
    println!("- Tavily AI for qualitative research");
    println!("- Yahoo Finance for quantitative data");
    println!("{rule}");
    println!("\nExamples of good queries:");
    println!("- Research on NVIDIA Corporation (NVDA)");
    println!("- Analyze Tesla's financial position (TSLA)");
    println!("- Evaluate Apple stock (AAPL)");
    println!("\nType 'exit' to quit at any time.\n");
}

/// Read queries until exit, EOF or Ctrl-C
///
/// A failing query never ends the loop.
pub async fn run(pipeline: &PipelineOrchestrator, sink: &dyn ReportSink) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("📈 Your investment query: ");
        io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = tokio::signal::ctrl_c() => {
                println!("{CANCELLED}");
                break;
            }
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => {
                println!("{GOODBYE}");
                break;
            }
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        };

        let query = match classify_input(&line) {
            Input::Exit => {
                println!("{GOODBYE}");
                break;
            }
            Input::TooShort => {
                println!("Please provide a more detailed query (at least {MIN_QUERY_CHARS} characters)");
                continue;
            }
            Input::Query(query) => query,
        };

        println!("\n⏳ Processing your request...");
        let result = tokio::select! {
            result = pipeline.run(query) => result,
            _ = tokio::signal::ctrl_c() => {
                println!("{CANCELLED}");
                break;
            }
        };

        if let Err(e) = sink.emit(&result) {
            println!("\n❌ Unexpected error: {e}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_words_any_case() {
        assert_eq!(classify_input("exit"), Input::Exit);
        assert_eq!(classify_input("  QUIT \n"), Input::Exit);
        assert_eq!(classify_input("Exit"), Input::Exit);
    }

    #[test]
    fn test_short_input_rejected() {
        assert_eq!(classify_input(""), Input::TooShort);
        assert_eq!(classify_input("xyz"), Input::TooShort);
        assert_eq!(classify_input(" TSLA "), Input::TooShort);
    }

    #[test]
    fn test_query_is_trimmed() {
        assert_eq!(
            classify_input("  Evaluate Apple stock (AAPL)\n"),
            Input::Query("Evaluate Apple stock (AAPL)")
        );
        assert_eq!(classify_input("exit now"), Input::Query("exit now"));
    }
}
