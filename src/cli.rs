use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "basic-llm-call", version, about = "Tool calling and structured output demos")]
pub struct Cli {
    /// Override the function call ceiling
    #[arg(long, global = true)]
    pub max_function_calls: Option<usize>,

    /// Override the sampling temperature
    #[arg(long, global = true)]
    pub temperature: Option<f32>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Weather query (single tool)
    Weather,
    /// Calendar query
    Calendar,
    /// Query needing several tools
    MultiTool,
    /// Calendar, reminder and weather in one request
    Complex,
    /// General query that needs no tools
    General,
    /// Current time in another timezone
    Datetime,
    /// Run any query through the tool-calling loop
    Ask { query: String },
    /// Request a structured JSON answer
    Structured {
        query: String,
        /// Use the product recommendation schema
        #[arg(long)]
        products: bool,
    },
    /// Single chat turn with a system prompt
    Chat { query: String },
    /// Intent analysis followed by an answer
    MultiStep { query: String },
}

impl Command {
    /// Canned query for the demo subcommands.
    pub fn demo_query(&self) -> Option<&'static str> {
        match self {
            Command::Weather => Some("What's the weather like in London today?"),
            Command::Calendar => Some("What's on my calendar for today?"),
            Command::MultiTool => Some(
                "What's the weather in Tokyo and do I have any meetings tomorrow?",
            ),
            Command::Complex => Some(
                "I have a dentist appointment tomorrow. Check my calendar to confirm the time, \
                 set a reminder for it, and check the weather. If it's going to rain, \
                 remind me to take an umbrella.",
            ),
            Command::General => Some("Tell me about artificial intelligence."),
            Command::Datetime => Some("What time is it in Tokyo right now?"),
            _ => None,
        }
    }
}
