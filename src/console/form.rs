//! Console form: line-based rendering of the quote wizard.
//!
//! Reads from any buffered async input (stdin in the binary) and writes to
//! any `Write` sink. Commands inside the contact dialog:
//! - `/close` closes the dialog and returns to the shipment form
//! - `/back` returns to step 1 from step 2

use std::io::Write;

use chrono::NaiveDate;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::sync::watch;

use crate::error::Error;
use crate::notify::DeliveryReceipt;
use crate::quote::{ContactStep, DraftField, QuoteWizard, StepOutcome, SubmissionStatus};

use super::confetti;

const CLOSE_COMMAND: &str = "/close";
const BACK_COMMAND: &str = "/back";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// How a console session ended.
#[derive(Debug, Clone)]
pub enum FormOutcome {
    Submitted(DeliveryReceipt),
    /// Input ended before a successful submission.
    Abandoned,
}

/// How the contact dialog was left.
enum DialogExit {
    Submitted(DeliveryReceipt),
    Closed,
    Eof,
}

/// Interactive terminal form driving a [`QuoteWizard`].
pub struct ConsoleForm<R, W> {
    lines: Lines<R>,
    out: W,
}

impl<R, W> ConsoleForm<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(input: R, out: W) -> Self {
        Self {
            lines: input.lines(),
            out,
        }
    }

    /// Give back the output sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Run one quote request from the shipment form to the thank-you view.
    pub async fn run(&mut self, wizard: &mut QuoteWizard) -> anyhow::Result<FormOutcome> {
        self.render_header(wizard)?;

        loop {
            if !self.read_shipment(wizard).await? {
                return Ok(FormOutcome::Abandoned);
            }

            writeln!(self.out, "[ Request Rate ]")?;
            if let Err(e) = wizard.request_rate() {
                writeln!(self.out, "⚠ {e}")?;
                continue;
            }

            match self.run_dialog(wizard).await? {
                DialogExit::Submitted(receipt) => {
                    self.render_confirmation(wizard).await?;
                    return Ok(FormOutcome::Submitted(receipt));
                }
                DialogExit::Closed => {
                    writeln!(self.out, "Dialog closed.")?;
                }
                DialogExit::Eof => return Ok(FormOutcome::Abandoned),
            }
        }
    }

    fn render_header(&mut self, wizard: &QuoteWizard) -> std::io::Result<()> {
        let draft = wizard.draft();
        writeln!(self.out, "Airfreight Console")?;
        writeln!(self.out, "==================")?;
        writeln!(self.out, "Origin:      {} (fixed)", draft.origin())?;
        writeln!(self.out, "Destination: {} (fixed)", draft.destination())?;
        writeln!(self.out)
    }

    /// Prompt and read one line. `None` on end of input.
    async fn prompt(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        write!(self.out, "{label}: ")?;
        self.out.flush()?;
        let line = self.lines.next_line().await?;
        Ok(line.map(|l| l.trim().to_string()))
    }

    /// Weight, volume and cargo ready date. Returns false on end of input.
    async fn read_shipment(&mut self, wizard: &mut QuoteWizard) -> anyhow::Result<bool> {
        for field in [DraftField::Weight, DraftField::Volume] {
            let Some(value) = self.prompt(field.label()).await? else {
                return Ok(false);
            };
            wizard.update_field(field, value);
        }

        // Only calendar dates get through, as with a date picker.
        loop {
            let label = format!("{} (YYYY-MM-DD)", DraftField::CargoReadyDate.label());
            let Some(value) = self.prompt(&label).await? else {
                return Ok(false);
            };
            if value.is_empty() {
                wizard.update_field(DraftField::CargoReadyDate, value);
                return Ok(true);
            }
            match NaiveDate::parse_from_str(&value, DATE_FORMAT) {
                Ok(date) => {
                    wizard.update_field(
                        DraftField::CargoReadyDate,
                        date.format(DATE_FORMAT).to_string(),
                    );
                    return Ok(true);
                }
                Err(_) => writeln!(self.out, "⚠ Please pick a date as YYYY-MM-DD.")?,
            }
        }
    }

    async fn run_dialog(&mut self, wizard: &mut QuoteWizard) -> anyhow::Result<DialogExit> {
        'steps: loop {
            let step = wizard.current_step();
            writeln!(
                self.out,
                "Step {} of {}: {}",
                step.number(),
                ContactStep::total(),
                step.title()
            )?;

            let fields = match step {
                ContactStep::Personal => [DraftField::FullName, DraftField::Email],
                ContactStep::Company => [DraftField::CompanyName, DraftField::ContactNumber],
            };
            for field in fields {
                let Some(value) = self.prompt(field.label()).await? else {
                    return Ok(DialogExit::Eof);
                };
                match value.as_str() {
                    CLOSE_COMMAND => {
                        wizard.close_dialog();
                        return Ok(DialogExit::Closed);
                    }
                    BACK_COMMAND => {
                        wizard.back_step()?;
                        continue 'steps;
                    }
                    _ => wizard.update_field(field, value),
                }
            }

            let status = wizard.subscribe();
            match show_sending(&mut self.out, status, wizard.advance_step(step)).await? {
                Ok(StepOutcome::Advanced(_)) => {}
                Ok(StepOutcome::Submitted(receipt)) => return Ok(DialogExit::Submitted(receipt)),
                Err(Error::Validation(e)) => writeln!(self.out, "⚠ {e}")?,
                Err(Error::Delivery(e)) => {
                    writeln!(self.out, "⚠ {e}")?;
                    return self.retry_loop(wizard).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// After a delivery failure: Enter retries, `/close` gives up.
    async fn retry_loop(&mut self, wizard: &mut QuoteWizard) -> anyhow::Result<DialogExit> {
        loop {
            let Some(value) = self
                .prompt("Press Enter to retry, or /close to cancel")
                .await?
            else {
                return Ok(DialogExit::Eof);
            };
            if value == CLOSE_COMMAND {
                wizard.close_dialog();
                return Ok(DialogExit::Closed);
            }

            let status = wizard.subscribe();
            match show_sending(&mut self.out, status, wizard.retry()).await? {
                Ok(receipt) => return Ok(DialogExit::Submitted(receipt)),
                Err(Error::Delivery(e)) => writeln!(self.out, "⚠ {e}")?,
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn render_confirmation(&mut self, wizard: &mut QuoteWizard) -> anyhow::Result<()> {
        if wizard.take_celebration() {
            let burst = confetti::burst(&mut rand::thread_rng(), 48, 3);
            writeln!(self.out, "{burst}")?;
        }
        writeln!(self.out, "🎉 Thank you! Your rate request has been sent.")?;
        writeln!(
            self.out,
            "A confirmation is on its way to {}.",
            wizard.draft().email
        )?;
        // End of input dismisses too.
        let _ = self.prompt("Press Enter to close").await?;
        wizard.dismiss_confirmation();
        Ok(())
    }
}

/// Await a wizard call, printing "Sending..." once its status enters
/// `Sending`. Calls that fail validation never get there and print nothing.
async fn show_sending<W, T>(
    out: &mut W,
    mut status: watch::Receiver<SubmissionStatus>,
    call: impl Future<Output = crate::error::Result<T>>,
) -> std::io::Result<crate::error::Result<T>>
where
    W: Write,
{
    tokio::pin!(call);
    let mut shown = false;

    let result = loop {
        tokio::select! {
            result = &mut call => break result,
            Ok(()) = status.changed(), if !shown => {
                if *status.borrow_and_update() == SubmissionStatus::Sending {
                    writeln!(out, "Sending...")?;
                    out.flush()?;
                    shown = true;
                }
            }
        }
    };

    // A notifier that answers without yielding finishes before the watcher
    // runs; the status has still passed through `Sending`.
    if !shown && status.has_changed().unwrap_or(false) && status.borrow_and_update().is_terminal()
    {
        writeln!(out, "Sending...")?;
    }
    Ok(result)
}
