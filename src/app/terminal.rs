use crate::app::views;
use crate::core::controller::FlowController;
use crate::core::flow::Card;
use crate::domain::model::{Decision, ProfileField};
use crate::domain::ports::RecommendationService;
use crate::utils::error::Result;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Like,
    Pass,
    Retry,
    Restart,
    Quit,
    Unknown,
}

impl Command {
    fn parse(input: &str) -> Self {
        match input.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" | "like" => Command::Like,
            "n" | "no" | "pass" => Command::Pass,
            "r" | "retry" => Command::Retry,
            "s" | "restart" => Command::Restart,
            "q" | "quit" | "exit" => Command::Quit,
            _ => Command::Unknown,
        }
    }
}

enum Answer {
    Keep,
    Clear,
    Value(String),
}

/// Line-oriented front end: prints the current view, reads one line of input
/// and turns it into a controller action.
pub struct TerminalApp<S: RecommendationService, R, W> {
    controller: FlowController<S>,
    input: Lines<R>,
    output: W,
}

impl<S, R, W> TerminalApp<S, R, W>
where
    S: RecommendationService,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(controller: FlowController<S>, input: R, output: W) -> Self {
        Self {
            controller,
            input: input.lines(),
            output,
        }
    }

    pub fn controller(&self) -> &FlowController<S> {
        &self.controller
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until the user quits or input ends.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            let keep_going = if self.controller.flow().draft().is_some() {
                self.capture_profile().await?
            } else {
                self.browse_once().await?
            };
            if !keep_going {
                break;
            }
        }
        writeln!(self.output, "👋 Bye!")?;
        self.output.flush()?;
        Ok(())
    }

    /// 依序詢問每個欄位；空白輸入保留目前的值，`:clear` 清空欄位
    async fn capture_profile(&mut self) -> Result<bool> {
        let draft = match self.controller.flow().draft() {
            Some(draft) => draft.clone(),
            None => return Ok(true),
        };
        write!(self.output, "{}", views::render_form(&draft, false))?;
        writeln!(
            self.output,
            "(press Enter to keep a value, :clear to empty it, :q to quit)"
        )?;

        for field in ProfileField::ALL {
            write!(self.output, "{} > ", views::field_line(&draft, field))?;
            if field.is_multiline() {
                write!(self.output, "(finish with an empty line) ")?;
            }
            self.output.flush()?;

            let Some(answer) = self.read_answer(field).await? else {
                return Ok(false);
            };
            match answer {
                Answer::Keep => {}
                Answer::Clear => self.controller.edit_field(field, String::new())?,
                Answer::Value(value) => self.controller.edit_field(field, value)?,
            }
        }

        writeln!(self.output, "Creating Profile...")?;
        self.output.flush()?;
        if let Err(e) = self.controller.submit_profile().await {
            writeln!(self.output, "❌ {}", e.user_friendly_message())?;
            writeln!(self.output, "💡 {}", e.recovery_suggestion())?;
        }
        self.print_notice()?;
        Ok(true)
    }

    /// Reads one answer. Multi-line fields keep reading until an empty line.
    /// Returns `None` when the user quits or input ends.
    async fn read_answer(&mut self, field: ProfileField) -> Result<Option<Answer>> {
        let Some(first) = self.input.next_line().await? else {
            return Ok(None);
        };
        match first.trim() {
            ":q" => return Ok(None),
            ":clear" => return Ok(Some(Answer::Clear)),
            "" => return Ok(Some(Answer::Keep)),
            _ => {}
        }
        if !field.is_multiline() {
            return Ok(Some(Answer::Value(first)));
        }

        let mut lines = vec![first];
        while let Some(line) = self.input.next_line().await? {
            if line.trim().is_empty() {
                break;
            }
            if line.trim() == ":q" {
                return Ok(None);
            }
            lines.push(line);
        }
        Ok(Some(Answer::Value(lines.join("\n"))))
    }

    async fn browse_once(&mut self) -> Result<bool> {
        if let Some(browsing) = self.controller.flow().browsing() {
            write!(self.output, "{}", views::render_browsing(browsing))?;
        }
        write!(self.output, "> ")?;
        self.output.flush()?;

        let Some(line) = self.input.next_line().await? else {
            return Ok(false);
        };

        let outcome = match Command::parse(&line) {
            Command::Quit => return Ok(false),
            Command::Like => self.controller.advance(Decision::Liked).await,
            Command::Pass => self.controller.advance(Decision::Disliked).await,
            Command::Retry => self.controller.retry().await,
            Command::Restart => self.controller.restart(),
            Command::Unknown => {
                let help = self.help_text();
                writeln!(self.output, "{}", help)?;
                Ok(())
            }
        };

        if let Err(e) = outcome {
            writeln!(self.output, "❌ {}", e.user_friendly_message())?;
        }
        self.print_notice()?;
        Ok(true)
    }

    fn help_text(&self) -> &'static str {
        match self.controller.flow().browsing().map(|b| b.card()) {
            Some(Card::Showing(_)) => "Type y to like, n to pass, q to quit",
            Some(Card::Unavailable) => "Type r to retry, s to start over, q to quit",
            _ => "Type s to start a new session, q to quit",
        }
    }

    fn print_notice(&mut self) -> Result<()> {
        if let Some(notice) = self.controller.take_notice() {
            writeln!(self.output, "⚠️ {}", notice)?;
        }
        Ok(())
    }
}
