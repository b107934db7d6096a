//! The interactive loop: a regime selector and two highlight toggles bound to the renderer
//!
//! A [`Session`] holds the dataset and what the user has selected. Every [`Command`] that
//! changes the selection, and every `show`, fits the selected regime again and hands a
//! [`Frame`] to the draw callback before returning. Nothing is cached between commands.
//!
//! ```rust
//! # use biasvar::{dataset::{Dataset, DatasetConfig}, model::BasisKind};
//! # use biasvar::session::{Command, Outcome, Session};
//! let data = Dataset::generate(&DatasetConfig::default()).unwrap();
//! let mut session = Session::new(data, BasisKind::Chebyshev);
//!
//! let mut degrees = vec![];
//! let mut draw = |frame: &biasvar::session::Frame<'_>| {
//!     degrees.push(frame.fit.degree());
//!     Ok(())
//! };
//!
//! let command: Command = "regime overfitting".parse().unwrap();
//! assert!(matches!(session.apply(command, &mut draw).unwrap(), Outcome::Redrawn(_)));
//! assert_eq!(degrees, vec![15]);
//! ```
use std::str::FromStr;

use crate::{
    dataset::Dataset,
    error::{Error, Result},
    model::{fit_regime, BasisKind, RegimeFit},
    plotting::{self, PlotBackend, PlotConfig, ViewState},
    regime::Regime,
};

/// Lines printed for `help`
pub const HELP: &str = "\
Commands:
  1 | 2 | 3                select a regime by its menu number
  regime <name>            select a regime: underfitting, balanced or overfitting
  train [on|off|toggle]    highlight the training set (no argument toggles)
  test [on|off|toggle]     highlight the test set (no argument toggles)
  show                     redraw the current selection
  help                     show this message
  quit                     exit";

/// How a command changes a display flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// Turn the flag on
    On,

    /// Turn the flag off
    Off,

    /// Invert the flag
    Flip,
}
impl Toggle {
    /// The new value of a flag that is currently `current`
    #[must_use]
    pub fn apply(self, current: bool) -> bool {
        match self {
            Toggle::On => true,
            Toggle::Off => false,
            Toggle::Flip => !current,
        }
    }
}
impl FromStr for Toggle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" | "show" | "yes" | "true" | "1" => Ok(Toggle::On),
            "off" | "hide" | "no" | "false" | "0" => Ok(Toggle::Off),
            "" | "toggle" | "flip" => Ok(Toggle::Flip),
            _ => Err(Error::UnknownCommand(s.trim().to_string())),
        }
    }
}

/// One user interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Choose a regime
    Select(Regime),

    /// Change the training set highlight
    SetTrain(Toggle),

    /// Change the test set highlight
    SetTest(Toggle),

    /// Redraw without changing anything
    Show,

    /// Print the command list
    Help,

    /// Leave the session
    Quit,
}
impl FromStr for Command {
    type Err = Error;

    /// Parses one line typed at the prompt, e.g. `regime overfitting`, `train off`, or `2`
    fn from_str(s: &str) -> Result<Self> {
        let line = s.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        let unknown = || Error::UnknownCommand(line.to_string());

        match head.to_ascii_lowercase().as_str() {
            "regime" | "select" | "r" if !rest.is_empty() => Ok(Command::Select(rest.parse()?)),
            "train" => Ok(Command::SetTrain(rest.parse().map_err(|_| unknown())?)),
            "test" => Ok(Command::SetTest(rest.parse().map_err(|_| unknown())?)),
            "show" | "draw" | "redraw" if rest.is_empty() => Ok(Command::Show),
            "help" | "h" | "?" if rest.is_empty() => Ok(Command::Help),
            "quit" | "exit" | "q" if rest.is_empty() => Ok(Command::Quit),

            // A bare regime name or menu number
            _ => line.parse().map(Command::Select).map_err(|_| unknown()),
        }
    }
}

/// What a draw callback receives: the fit that was just made, and what to highlight
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// The dataset being shown
    pub data: &'a Dataset,

    /// The model for the selected regime
    pub fit: &'a RegimeFit,

    /// Partition highlights
    pub view: ViewState,
}

/// Result of one command
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The selection was fit and drawn; carries the fit's one-line summary
    Redrawn(String),

    /// The user asked for the command list
    Help,

    /// The user asked to leave
    Quit,
}

/// The selector state between interactions
#[derive(Debug, Clone)]
pub struct Session {
    data: Dataset,
    basis: BasisKind,
    regime: Regime,
    view: ViewState,
}
impl Session {
    /// Starts on the default regime, with both partitions highlighted
    #[must_use]
    pub fn new(data: Dataset, basis: BasisKind) -> Self {
        Self {
            data,
            basis,
            regime: Regime::default(),
            view: ViewState::default(),
        }
    }

    /// Start on `regime` instead of the default
    #[must_use]
    pub fn with_regime(mut self, regime: Regime) -> Self {
        self.regime = regime;
        self
    }

    /// Start with the given highlights
    #[must_use]
    pub fn with_view(mut self, view: ViewState) -> Self {
        self.view = view;
        self
    }

    /// The dataset every fit uses
    #[must_use]
    pub fn data(&self) -> &Dataset {
        &self.data
    }

    /// The basis every fit uses
    #[must_use]
    pub fn basis(&self) -> BasisKind {
        self.basis
    }

    /// The selected regime
    #[must_use]
    pub fn regime(&self) -> Regime {
        self.regime
    }

    /// The current highlights
    #[must_use]
    pub fn view(&self) -> ViewState {
        self.view
    }

    /// The numbered regime menu, with the current selection and toggles marked
    #[must_use]
    pub fn menu(&self) -> String {
        let mut menu = String::new();
        for regime in Regime::ALL {
            let marker = if regime == self.regime { '*' } else { ' ' };
            menu.push_str(&format!(
                "{marker} {}. {:<13} degree {:>2}: {}\n",
                regime.index(),
                regime.label(),
                regime.degree(),
                regime.description()
            ));
        }
        menu.push_str(&format!(
            "  train highlight: {}, test highlight: {}",
            on_off(self.view.show_train),
            on_off(self.view.show_test)
        ));
        menu
    }

    /// Applies one command, re-fitting and drawing synchronously when the selection changes
    ///
    /// The state is updated before the fit, so a failed draw leaves the new selection in place.
    ///
    /// # Errors
    /// Any error from fitting, or from `draw`.
    pub fn apply<F>(&mut self, command: Command, draw: &mut F) -> Result<Outcome>
    where
        F: FnMut(&Frame<'_>) -> Result<()>,
    {
        match command {
            Command::Select(regime) => self.regime = regime,
            Command::SetTrain(toggle) => self.view.show_train = toggle.apply(self.view.show_train),
            Command::SetTest(toggle) => self.view.show_test = toggle.apply(self.view.show_test),
            Command::Show => {}
            Command::Help => return Ok(Outcome::Help),
            Command::Quit => return Ok(Outcome::Quit),
        }

        self.redraw(draw)
    }

    /// Fits the current selection and draws it
    ///
    /// # Errors
    /// Any error from fitting, or from `draw`.
    pub fn redraw<F>(&self, draw: &mut F) -> Result<Outcome>
    where
        F: FnMut(&Frame<'_>) -> Result<()>,
    {
        let fit = fit_regime(&self.data, self.regime, self.basis)?;
        draw(&Frame {
            data: &self.data,
            fit: &fit,
            view: self.view,
        })?;

        log::debug!("redrew {}", self.regime);
        Ok(Outcome::Redrawn(fit.summary()))
    }
}

/// A draw callback that renders each frame to `backend`
///
/// Backend errors become [`Error::Render`].
pub fn renderer<'b, B: PlotBackend>(
    backend: &'b mut B,
    config: &'b PlotConfig,
) -> impl FnMut(&Frame<'_>) -> Result<()> + 'b {
    move |frame: &Frame<'_>| {
        plotting::render(&mut *backend, frame.data, frame.fit, &frame.view, config)
            .map_err(|e| Error::Render(e.to_string()))
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}
