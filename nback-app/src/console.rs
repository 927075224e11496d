use std::io::{BufRead, Write};

use nback_core::{Modality, StimulusIndex, Trial, TrialOutcome};
use nback_session::{Adjustment, BlockReport, DayEnd, DaySummary, Presenter, Result};

/// Consonants read out for audio indices 0..8.
const CONSONANTS: [char; 8] = ['C', 'H', 'K', 'L', 'Q', 'R', 'S', 'T'];

/// Grid cell of each visual index: the 3x3 grid without its centre.
const CELLS: [(usize, usize); 8] = [
    (0, 0),
    (0, 1),
    (0, 2),
    (1, 0),
    (1, 2),
    (2, 0),
    (2, 1),
    (2, 2),
];

pub fn consonant(index: StimulusIndex) -> char {
    CONSONANTS[index.get() as usize]
}

/// Line-oriented presenter: one input line per trial.
pub struct ConsolePresenter<I: BufRead, W: Write> {
    input: I,
    out: W,
}

impl<I: BufRead, W: Write> ConsolePresenter<I, W> {
    pub fn new(input: I, out: W) -> Self {
        Self { input, out }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    fn draw_grid(&mut self, visual: StimulusIndex) -> Result<()> {
        let lit = CELLS[visual.get() as usize];
        for row in 0..3 {
            let line: String = (0..3)
                .map(|col| if (row, col) == lit { " ■ " } else { " · " })
                .collect();
            writeln!(self.out, "    {line}")?;
        }
        Ok(())
    }
}

/// Parses a response line; `None` means the subject wants to stop.
pub fn parse_response(line: &str) -> Option<Vec<Modality>> {
    let mut responses = Vec::new();
    for c in line.trim().chars().map(|c| c.to_ascii_lowercase()) {
        let modality = match c {
            'q' => return None,
            'a' => Modality::Visual,
            'l' => Modality::Audio,
            _ => continue,
        };
        if !responses.contains(&modality) {
            responses.push(modality);
        }
    }
    Some(responses)
}

impl<I: BufRead, W: Write> Presenter for ConsolePresenter<I, W> {
    fn block_started(&mut self, block: u32, n_interval: u32, last_rate: Option<f64>) -> Result<()> {
        writeln!(self.out)?;
        if let Some(rate) = last_rate {
            write!(self.out, "Last block: {:.0}% correct. ", rate * 100.0)?;
        }
        writeln!(self.out, "Block {} is {n_interval}-back.", block + 1)?;
        Ok(())
    }

    fn present(&mut self, trial: &Trial, position: (usize, usize)) -> Result<Option<Vec<Modality>>> {
        writeln!(
            self.out,
            "\nTrial {}/{}  letter {}",
            position.0,
            position.1,
            consonant(trial.audio)
        )?;
        self.draw_grid(trial.visual)?;
        if trial.guessable {
            write!(self.out, "match? [a] square [l] letter > ")?;
        } else {
            write!(self.out, "memorise, ENTER to continue > ")?;
        }
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(parse_response(&line))
    }

    fn response_feedback(&mut self, modality: Modality, hit: bool) -> Result<()> {
        let what = match modality {
            Modality::Visual => "square",
            Modality::Audio => "letter",
        };
        let mark = if hit { "hit" } else { "miss" };
        writeln!(self.out, "  {what}: {mark}")?;
        Ok(())
    }

    fn trial_judged(&mut self, exact: bool) -> Result<()> {
        if !exact {
            writeln!(self.out, "  (not quite)")?;
        }
        Ok(())
    }

    fn block_finished(&mut self, report: &BlockReport) -> Result<()> {
        writeln!(
            self.out,
            "\nBlock {} done: {} right, {} wrong.",
            report.block + 1,
            report.right_count,
            report.wrong_count
        )?;
        let note = match report.adjustment {
            Adjustment::Advanced => "Level up!".to_string(),
            Adjustment::FellBack => "Dropping a level.".to_string(),
            Adjustment::Strike(streak) => format!("Rough block ({streak} in a row)."),
            Adjustment::Held | Adjustment::Undefined => "Level unchanged.".to_string(),
        };
        writeln!(self.out, "{note}")?;
        Ok(())
    }

    fn day_finished(&mut self, summary: &DaySummary, outcomes: &[TrialOutcome]) -> Result<()> {
        let exact = outcomes.iter().filter(|o| o.exact).count();
        let heading = match summary.end {
            DayEnd::Completed => "Training day complete.",
            DayEnd::Interrupted => "Stopped early.",
        };
        writeln!(self.out, "\n{heading}")?;
        writeln!(
            self.out,
            "{} blocks, {exact}/{} trials answered exactly. Next session starts at {}-back.",
            summary.blocks.len(),
            outcomes.len(),
            summary.n_interval
        )?;
        self.out.flush()?;
        Ok(())
    }
}
