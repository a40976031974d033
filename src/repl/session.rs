//! Chat REPL session management

use std::sync::Arc;

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::config::Config;
use crate::export;
use crate::llm::LlmClient;
use crate::prompts::PromptLoader;
use crate::record::{Category, DesignRecord};
use crate::session::ConversationSession;

/// Interactive guided-conversation REPL
///
/// Input is read strictly between requests, so there is never more than one
/// call in flight.
pub struct ChatRepl {
    session: ConversationSession,
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLoader>,
    export_dir: std::path::PathBuf,
    spec_max_tokens: u32,
}

impl ChatRepl {
    /// Create a new REPL around a fresh session
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>, config: &Config) -> Self {
        let session = ConversationSession::new(llm.clone(), prompts.clone(), config.session.clone());
        Self {
            session,
            llm,
            prompts,
            export_dir: config.export.output_dir.clone(),
            spec_max_tokens: config.export.spec_max_tokens,
        }
    }

    /// Run the REPL main loop
    pub async fn run(&mut self, initial_message: Option<String>) -> Result<()> {
        self.print_welcome();

        if let Some(message) = initial_message {
            println!("{} {}", ">".bright_green(), message);
            self.process_user_input(&message).await;
        }

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_slash_command(input).await {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        }
                    } else {
                        self.process_user_input(input).await;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C - just show a new prompt
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D - exit
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Hej då!");
        Ok(())
    }

    /// Print the opening message
    fn print_welcome(&self) {
        println!();
        println!("{}", "designcoach".bright_cyan().bold());
        println!();
        println!("Hej! Jag är din learning design-partner. 🎯");
        println!();
        println!("Jag hjälper dig att tänka igenom och designa en riktigt bra utbildning.");
        println!("Under vårt samtal fyller vi tillsammans i din utbildningsdesign.");
        println!();
        println!("Börja gärna med att berätta: Vad är det för utbildning du vill skapa,");
        println!("och varför behövs den?");
        println!();
        println!(
            "Skriv {} för kommandon, {} för att avsluta.",
            "/help".yellow(),
            "/quit".yellow()
        );
        println!();
    }

    /// Handle slash commands
    async fn handle_slash_command(&mut self, input: &str) -> SlashResult {
        let cmd = input.split_whitespace().next().unwrap_or("");

        match cmd {
            "/help" | "/h" => {
                self.print_help();
                SlashResult::Continue
            }
            "/quit" | "/q" | "/exit" => SlashResult::Quit,
            "/record" | "/r" => {
                self.print_record();
                SlashResult::Continue
            }
            "/export" | "/e" => {
                self.export_design();
                SlashResult::Continue
            }
            "/spec" => {
                self.export_specification().await;
                SlashResult::Continue
            }
            "/reset" => {
                self.session.reset();
                println!("{}", "Konversationen och designen har nollställts.".dimmed());
                SlashResult::Continue
            }
            _ => {
                println!("{} Okänt kommando: {}", "?".yellow(), cmd);
                println!("Skriv {} för tillgängliga kommandon", "/help".yellow());
                SlashResult::Continue
            }
        }
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Kommandon:".bright_cyan());
        println!("  {:10} Visa denna hjälp", "/help".yellow());
        println!("  {:10} Visa utbildningsdesignen", "/record".yellow());
        println!("  {:10} Exportera designen som dokument", "/export".yellow());
        println!("  {:10} Generera och exportera en utbildningsspecifikation", "/spec".yellow());
        println!("  {:10} Nollställ konversationen och designen", "/reset".yellow());
        println!("  {:10} Avsluta", "/quit".yellow());
        println!();
    }

    /// Dashboard view of the record
    fn print_record(&self) {
        let record = self.session.record();

        println!();
        println!(
            "{} ({}/{} kategorier fyllda)",
            "Din utbildningsdesign".bright_cyan(),
            record.filled_count(),
            DesignRecord::TOTAL
        );

        for category in Category::ALL {
            println!();
            println!("{}", category.label().bold());
            match record.seq(category) {
                None if record.is_filled(category) => println!("  {}", record.target_audience),
                Some(seq) if !seq.is_empty() => {
                    for item in seq {
                        println!("  - {}", item);
                    }
                }
                _ => println!("  {}", "(inte ifyllt ännu)".dimmed()),
            }
        }
        println!();
    }

    /// Send one user message through the session and print the outcome
    async fn process_user_input(&mut self, input: &str) {
        let reply = self.session.send_message(input).await;

        println!();
        if reply.failure.is_some() {
            println!("{}", reply.text.yellow());
            println!();
            return;
        }

        println!("{}", reply.text);

        for entry in &reply.merged {
            println!("{}", format!("✅ {}: {}", entry.category.label(), entry.value).dimmed());
        }
        if !reply.merged.is_empty() {
            println!(
                "{}",
                format!("({}/{} kategorier fyllda)", reply.filled_count, DesignRecord::TOTAL).dimmed()
            );
        }
        println!();
    }

    /// Export the design document
    fn export_design(&self) {
        match export::export_design(self.session.record(), &self.export_dir) {
            Ok(path) => println!("Designen exporterad: {}", path.display().to_string().bright_white()),
            Err(e) => println!("{} {}", "Kunde inte exportera designen:".red(), e),
        }
    }

    /// Generate and export the long-form specification
    async fn export_specification(&mut self) {
        let record = self.session.record();
        if !record.is_complete() {
            println!(
                "{}",
                format!(
                    "Designen är inte komplett ({}/{} kategorier) - specifikationen blir bättre när allt är ifyllt.",
                    record.filled_count(),
                    DesignRecord::TOTAL
                )
                .yellow()
            );
        }

        println!("{}", "Genererar utbildningsspecifikation ...".dimmed());

        match export::generate_specification(&self.llm, &self.prompts, record, self.spec_max_tokens).await {
            Ok(text) => match export::export_specification(&text, &self.export_dir) {
                Ok(path) => println!("Specifikationen exporterad: {}", path.display().to_string().bright_white()),
                Err(e) => println!("{} {}", "Kunde inte skriva specifikationen:".red(), e),
            },
            Err(e) => println!("{} {}", "Kunde inte generera specifikationen:".red(), e),
        }
    }
}

/// Result of handling a slash command
enum SlashResult {
    Continue,
    Quit,
}
