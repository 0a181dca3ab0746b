mod cli;

use anyhow::{Context, Result};
use clap::Parser;

use basic_llm_call::config::AppConfig;
use basic_llm_call::llm::azure_openai::AzureOpenAiProvider;
use basic_llm_call::llm::retry::{RetryPolicy, RetryProvider};
use basic_llm_call::structured::{self, ProductRecommendations, StructuredResponse};
use basic_llm_call::{create_default_registry, logging, workflow, Agent, LoopResult, Message};
use cli::{Cli, Command};

fn print_loop_result(result: &LoopResult) -> Result<()> {
    if result.function_calls.is_empty() {
        println!("No tools called");
    }
    for (i, call) in result.function_calls.iter().enumerate() {
        println!("\nTool {}: {}", i + 1, call.function_name);
        println!("Arguments: {}", call.function_args);
        println!(
            "Response: {}",
            serde_json::to_string_pretty(&call.function_response)?
        );
    }
    if result.max_calls_reached {
        println!("\n[Function call ceiling reached]");
    }
    println!(
        "\nFinal response: {}",
        result.final_response.as_deref().unwrap_or("(none)")
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(max) = cli.max_function_calls {
        config.generation.max_function_calls = max;
    }
    if let Some(temperature) = cli.temperature {
        config.generation.temperature = temperature;
    }
    logging::init(&config.logging)?;

    let provider = AzureOpenAiProvider::from_config(&config.azure)
        .context("Failed to create Azure OpenAI client")?;
    let provider = RetryProvider::new(provider, RetryPolicy::new(&config.retry));
    let params = config.generation.params();

    match &cli.command {
        Command::Ask { query } => {
            let agent = Agent::new(Box::new(provider), create_default_registry())
                .with_max_function_calls(config.generation.max_function_calls);
            print_loop_result(&agent.process_query(query, &params).await?)?;
        }
        Command::Structured { query, products } => {
            let json = if *products {
                let answer: ProductRecommendations =
                    structured::request_structured(&provider, query, &params).await?;
                serde_json::to_string_pretty(&answer)?
            } else {
                let answer: StructuredResponse =
                    structured::request_structured(&provider, query, &params).await?;
                serde_json::to_string_pretty(&answer)?
            };
            println!("{}", json);
        }
        Command::Chat { query } => {
            let messages = vec![
                Message::system(
                    "You are a helpful assistant specializing in LLM Model Context Protocol.",
                ),
                Message::user(query.as_str()),
            ];
            let answer = workflow::chat(&provider, messages, &workflow::chat_params()).await?;
            println!("Result: {}", answer);
        }
        Command::MultiStep { query } => {
            let result = workflow::multi_step(&provider, query, &params).await?;
            println!("Intent Analysis: {}", result.intent_analysis);
            println!("Final Answer: {}", result.final_answer);
        }
        demo => {
            let query = demo.demo_query().context("No demo query for command")?;
            println!("Query: {}", query);
            let agent = Agent::new(Box::new(provider), create_default_registry())
                .with_max_function_calls(config.generation.max_function_calls);
            print_loop_result(&agent.process_query(query, &params).await?)?;
        }
    }

    Ok(())
}
