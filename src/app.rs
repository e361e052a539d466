//! Interactive guided session
//!
//! Line-oriented front end over the `Studio`: one command per line, one step
//! at a time. Gating failures print why the step will not advance; they are
//! never errors. The capture session is released on every exit path.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;

use crate::capture::CaptureError;
use crate::generation::ScriptGenerator;
use crate::store::StateStore;
use crate::studio::Studio;
use crate::workflow::WorkflowStep;

pub struct App<S: StateStore> {
    studio: Studio<S>,
    generator: Arc<dyn ScriptGenerator>,
    export_dir: PathBuf,
}

impl<S: StateStore> App<S> {
    pub fn new(studio: Studio<S>, generator: Arc<dyn ScriptGenerator>, export_dir: PathBuf) -> Self {
        Self {
            studio,
            generator,
            export_dir,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        println!("podcast-studio: guided podcast creation");
        println!("Type 'help' for commands.\n");
        self.print_step();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    match line? {
                        Some(line) => {
                            if self.handle_command(line.trim(), &mut lines).await? {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("received Ctrl+C, shutting down");
                    break;
                }
            }
        }

        // Teardown: the recording handle must not outlive the session.
        self.studio.capture_mut().reset().await;
        info!("session closed");
        Ok(())
    }

    /// Dispatch one command line. Returns true to quit.
    async fn handle_command(
        &mut self,
        line: &str,
        lines: &mut Lines<BufReader<Stdin>>,
    ) -> Result<bool> {
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((head, tail)) => (head, tail.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "help" => self.print_help(),
            "status" => self.print_status(),
            "show" => self.print_draft(),
            "topic" => self.set_field(WorkflowStep::Topic, rest, |d, v| d.topic = v)?,
            "points" => self.set_field(WorkflowStep::Topic, rest, |d, v| d.key_points = v)?,
            "script" => self.set_field(WorkflowStep::Script, rest, |d, v| d.script = v)?,
            "generate" => self.cmd_generate().await,
            "next" => self.cmd_next()?,
            "back" => {
                if self.studio.retreat()? {
                    self.print_step();
                } else {
                    println!("There is no step to go back to from here.");
                }
            }
            "record" => self.cmd_record().await,
            "stop" => self.cmd_stop().await,
            "again" => {
                self.studio.capture_mut().reset().await;
                println!("Recording discarded. Use 'record' for a new take.");
            }
            "export" => self.cmd_export()?,
            "restart" => {
                if self.cmd_restart(lines).await? {
                    self.print_step();
                }
            }
            "quit" | "exit" => return Ok(true),
            other => println!("Unknown command '{}'. Type 'help'.", other),
        }

        Ok(false)
    }

    fn set_field(
        &mut self,
        expected_step: WorkflowStep,
        value: &str,
        apply: impl FnOnce(&mut crate::workflow::PodcastDraft, String),
    ) -> Result<()> {
        if self.studio.step() != expected_step {
            println!("That field belongs to the '{}' step.", expected_step);
            return Ok(());
        }
        self.studio.update_draft(|d| apply(d, value.to_string()))?;
        println!("Saved.");
        Ok(())
    }

    async fn cmd_generate(&mut self) {
        if self.studio.step() != WorkflowStep::Script {
            println!("Script generation is available on the script step.");
            return;
        }

        println!("Asking the writer's room for a draft script...");
        let generator = self.generator.clone();
        // Ctrl+C drops the in-flight request; the draft stays untouched, so a
        // late response can never overwrite newer edits.
        tokio::select! {
            result = self.studio.generate_script(generator.as_ref()) => match result {
                Ok(()) => println!(
                    "Script ready ({} chars). Edit it with 'script <text>' or continue with 'next'.",
                    self.studio.draft().script.len()
                ),
                Err(e) => println!("Could not generate a script: {}. Retry, or write one manually.", e),
            },
            _ = tokio::signal::ctrl_c() => {
                println!("Generation cancelled.");
            }
        }
    }

    fn cmd_next(&mut self) -> Result<()> {
        if self.studio.advance()? {
            self.print_step();
            return Ok(());
        }
        match self.studio.step() {
            WorkflowStep::Topic => {
                println!("Not yet: the topic needs more than 5 characters and the key points more than 10.")
            }
            WorkflowStep::Script => {
                println!("Not yet: the script needs at least 50 characters.")
            }
            WorkflowStep::Recording => {
                println!("Not yet: finish a recording first ('record', then 'stop').")
            }
            WorkflowStep::Completed => println!("This is the final step; 'restart' begins anew."),
            WorkflowStep::Introduction => {}
        }
        Ok(())
    }

    async fn cmd_record(&mut self) {
        if self.studio.step() != WorkflowStep::Recording {
            println!("Recording is available on the recording step.");
            return;
        }
        match self.studio.capture_mut().start().await {
            Ok(()) => println!("Recording... read your script aloud, then 'stop'."),
            Err(CaptureError::AlreadyRecorded) => {
                println!("You already have a finished take. 'again' discards it, 'next' keeps it.")
            }
            Err(CaptureError::AlreadyRecording) => println!("Already recording; 'stop' to finish."),
            Err(e) => println!("Could not start recording: {}. Check your microphone and try again.", e),
        }
    }

    async fn cmd_stop(&mut self) {
        match self.studio.capture_mut().stop().await {
            Ok(()) => {
                if let Some(handle) = self.studio.capture().export() {
                    println!(
                        "Recording ready ({:.1}s). 'next' to finish, or 'again' for another take.",
                        handle.duration_secs()
                    );
                }
            }
            Err(e) => println!("Could not stop: {}", e),
        }
    }

    fn cmd_export(&mut self) -> Result<()> {
        match self.studio.export() {
            Some(artifact) => {
                let path = artifact.write_to_dir(&self.export_dir)?;
                println!("Saved your podcast to {:?}.", path);
            }
            None => println!("No finished recording to export."),
        }
        Ok(())
    }

    async fn cmd_restart(&mut self, lines: &mut Lines<BufReader<Stdin>>) -> Result<bool> {
        println!("Start over? All progress will be erased. [y/N]");
        let answer = lines.next_line().await?.unwrap_or_default();
        let confirmed = matches!(answer.trim(), "y" | "Y" | "yes");
        let restarted = self.studio.restart(confirmed).await?;
        if !restarted {
            println!("Keeping your session.");
        }
        Ok(restarted)
    }

    fn print_step(&self) {
        let step = self.studio.step();
        println!("\n=== {} ===", step.title());
        match step {
            WorkflowStep::Introduction => println!(
                "This tool walks you step by step through creating a critical-analysis \
                 podcast, from the first idea to the final recording. 'next' to begin."
            ),
            WorkflowStep::Topic => println!(
                "What do you want to talk about? Set it with 'topic <text>' and \
                 'points <text>', then 'next'."
            ),
            WorkflowStep::Script => println!(
                "Draft a script with 'generate', or write your own with 'script <text>'. \
                 'next' when it is ready."
            ),
            WorkflowStep::Recording => println!(
                "Read your script aloud. 'record' to start, 'stop' to finish, 'again' to retake."
            ),
            WorkflowStep::Completed => println!(
                "Congratulations, your podcast is ready! 'export' to save the audio, \
                 'restart' to create a new one."
            ),
        }
    }

    fn print_status(&self) {
        let draft = self.studio.draft();
        println!(
            "step: {} | topic: {} chars | key points: {} chars | script: {} chars | capture: {}",
            self.studio.step(),
            draft.topic.trim().len(),
            draft.key_points.trim().len(),
            draft.script.trim().len(),
            self.studio.capture().state(),
        );
    }

    fn print_draft(&self) {
        let draft = self.studio.draft();
        println!("topic: {}", draft.topic);
        println!("key points: {}", draft.key_points);
        println!("script:\n{}", draft.script);
    }

    fn print_help(&self) {
        println!("commands:");
        println!("  status / show         current step and draft");
        println!("  topic <text>          set the podcast topic");
        println!("  points <text>         set the key points to explore");
        println!("  script <text>         set the script by hand");
        println!("  generate              draft a script from topic and key points");
        println!("  record / stop / again capture your voice");
        println!("  next / back           move between steps");
        println!("  export                save the finished recording");
        println!("  restart               erase everything and start over");
        println!("  quit                  leave (progress is saved)");
    }
}
