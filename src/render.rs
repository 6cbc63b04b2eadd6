//! Terminal presentation of the menu

use colored::Colorize;
use log::warn;
use std::io::{self, Write};

use crate::menu::{Direction, Presenter, SelectionEvent, SelectionState};
use crate::story::Story;

const PROMPT: &str = "Use the joystick to select an option and press the button to confirm.";

/// Writes the story, the numbered choices and the highlighted selection
pub struct TerminalPresenter<'a, W: Write> {
    story: &'a Story,
    out: W,
}

impl<'a> TerminalPresenter<'a, io::Stdout> {
    pub fn stdout(story: &'a Story) -> Self {
        Self::new(story, io::stdout())
    }
}

impl<'a, W: Write> TerminalPresenter<'a, W> {
    pub fn new(story: &'a Story, out: W) -> Self {
        Self { story, out }
    }

    /// Print the outcome of the confirmed choice
    pub fn show_outcome(&mut self, index: usize) {
        let text = self.story.resolve(index);
        let result = writeln!(self.out, "\n{}", text.green().bold());
        self.report(result);
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_menu(&mut self, state: &SelectionState) -> io::Result<()> {
        writeln!(self.out, "\n{}", self.story.text.white().bold())?;
        for (i, choice) in self.story.choices.iter().enumerate() {
            writeln!(self.out, "{}. {}", i + 1, choice.label)?;
        }
        writeln!(self.out, "{}", PROMPT.dimmed())?;

        if let Some(label) = self.story.label(state.index()) {
            writeln!(self.out, "{} {}", ">".cyan().bold(), label.cyan().bold())?;
        }
        self.out.flush()
    }

    fn report(&mut self, result: io::Result<()>) {
        if let Err(e) = result {
            warn!("failed to write menu output: {}", e);
        }
    }
}

impl<W: Write> Presenter for TerminalPresenter<'_, W> {
    fn render(&mut self, state: &SelectionState) {
        let result = self.write_menu(state);
        self.report(result);
    }

    fn notify(&mut self, event: &SelectionEvent) {
        let result = match event {
            SelectionEvent::Axis(Direction::Left) => writeln!(self.out, "Joystick moved LEFT"),
            SelectionEvent::Axis(Direction::Right) => writeln!(self.out, "Joystick moved RIGHT"),
            // Movement shows up on the next render
            SelectionEvent::Moved { .. } | SelectionEvent::Confirmed { .. } => Ok(()),
        };
        self.report(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(presenter: TerminalPresenter<'_, Vec<u8>>) -> String {
        String::from_utf8(presenter.into_inner()).unwrap()
    }

    #[test]
    fn test_render_lists_choices_and_highlight() {
        let story = Story::default();
        let mut state = SelectionState::new(story.choice_count()).unwrap();
        state.move_down();

        let mut presenter = TerminalPresenter::new(&story, Vec::new());
        presenter.render(&state);
        let text = output(presenter);

        assert!(text.contains("You are in a dark forest."));
        assert!(text.contains("1. Go left towards the sound."));
        assert!(text.contains("3. Stay where you are."));
        assert!(text.contains("press the button to confirm"));
        let last = text.lines().last().unwrap();
        assert!(last.contains("Go right towards the light."));
    }

    #[test]
    fn test_axis_notifications() {
        let story = Story::default();
        let mut presenter = TerminalPresenter::new(&story, Vec::new());
        presenter.notify(&SelectionEvent::Axis(Direction::Left));
        presenter.notify(&SelectionEvent::Moved { from: 0, to: 1 });
        presenter.notify(&SelectionEvent::Axis(Direction::Right));

        assert_eq!(output(presenter), "Joystick moved LEFT\nJoystick moved RIGHT\n");
    }

    #[test]
    fn test_outcome_text() {
        let story = Story::default();
        let mut presenter = TerminalPresenter::new(&story, Vec::new());
        presenter.show_outcome(1);
        presenter.show_outcome(9);

        let text = output(presenter);
        assert!(text.contains("It leads you out of the forest."));
        assert!(text.contains("Invalid selection."));
    }
}
