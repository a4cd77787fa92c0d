//! Interactive tracking session.
//!
//! A [`Session`] owns the roster, both entry forms and the map view for the
//! lifetime of one run. Input arrives as one command per line; each command
//! is applied to completion before the next is read, so there is never more
//! than one mutation in flight.

use std::io::{BufRead, Write};

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};

use crate::config::{Config, FormsConfig};
use crate::error::{Error, Result};
use crate::form::{MemberForm, ShelterForm};
use crate::map::{FormKind, MapView};
use crate::model::MemberId;
use crate::roster::Roster;

/// One line of session input.
#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct SessionLine {
    /// The command to apply.
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Commands understood by a session.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum SessionCommand {
    /// Fill in and submit the member form
    Member {
        /// Member name
        name: String,
        /// Latitude in degrees
        #[arg(allow_hyphen_values = true)]
        latitude: String,
        /// Longitude in degrees
        #[arg(allow_hyphen_values = true)]
        longitude: String,
        /// Associated shelter name
        shelter: Option<String>,
    },

    /// Fill in and submit the shelter form
    Shelter {
        /// Shelter name
        name: String,
        /// Latitude in degrees
        #[arg(allow_hyphen_values = true)]
        latitude: String,
        /// Longitude in degrees
        #[arg(allow_hyphen_values = true)]
        longitude: String,
    },

    /// Flip a member between safe and missing
    Toggle {
        /// Member id
        id: u64,
    },

    /// Remove a member
    Remove {
        /// Member id
        id: u64,
    },

    /// Show the member list
    List,

    /// Show every map marker
    Markers,

    /// Print the map as GeoJSON
    Geojson,

    /// Show member and shelter counts
    Stats,

    /// Show or hide an entry form
    Form {
        /// Which form to toggle
        #[arg(value_enum)]
        which: FormArg,
    },

    /// End the session
    #[command(alias = "exit")]
    Quit,
}

/// Form selector argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormArg {
    /// The member form
    Member,
    /// The shelter form
    Shelter,
}

impl From<FormArg> for FormKind {
    fn from(arg: FormArg) -> Self {
        match arg {
            FormArg::Member => Self::Member,
            FormArg::Shelter => Self::Shelter,
        }
    }
}

/// What the driver should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next command.
    Continue,
    /// Stop reading input.
    Quit,
}

/// One in-memory tracking session.
#[derive(Debug)]
pub struct Session {
    roster: Roster,
    member_form: MemberForm,
    shelter_form: ShelterForm,
    map: MapView,
    rules: FormsConfig,
}

impl Session {
    /// Create an empty session.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            roster: Roster::new(),
            member_form: MemberForm::default(),
            shelter_form: ShelterForm::default(),
            map: MapView::new(config.map.clone()),
            rules: config.forms.clone(),
        }
    }

    /// The session's roster.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The session's map view.
    #[must_use]
    pub fn map(&self) -> &MapView {
        &self.map
    }

    /// Read and apply commands until end of input or `quit`.
    ///
    /// Malformed commands and rejected forms are reported on `out` and do not
    /// end the session.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W, prompt: bool) -> Result<()> {
        info!("Session started");
        let mut lines = input.lines();
        loop {
            if prompt {
                write!(out, "famtrack> ")?;
                out.flush()?;
            }
            let Some(line) = lines.next() else {
                break;
            };
            match self.execute(&line?, out) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(err @ (Error::Form(_) | Error::InvalidCommand { .. } | Error::FormHidden(_))) => {
                    debug!(error = %err, "Command rejected");
                    writeln!(out, "error: {err}")?;
                }
                Err(err) => return Err(err),
            }
        }
        info!(stats = ?self.roster.stats(), "Session ended");
        Ok(())
    }

    /// Parse and apply a single input line.
    ///
    /// Blank lines and lines starting with `#` are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the line is not a valid command, a form submission
    /// is rejected, or writing output fails.
    pub fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Flow::Continue);
        }

        let words = split_words(line)?;
        match SessionLine::try_parse_from(words) {
            Ok(parsed) => self.apply(parsed.command, out),
            Err(err) if err.kind() == clap::error::ErrorKind::DisplayHelp => {
                write!(out, "{}", err.render())?;
                Ok(Flow::Continue)
            }
            Err(err) => Err(Error::invalid_command(
                err.render().to_string().trim_end().trim_start_matches("error: "),
            )),
        }
    }

    /// Apply a parsed command.
    ///
    /// # Errors
    ///
    /// Returns an error if a form submission is rejected, the target form is
    /// hidden, or writing output fails.
    pub fn apply<W: Write>(&mut self, command: SessionCommand, out: &mut W) -> Result<Flow> {
        match command {
            SessionCommand::Member {
                name,
                latitude,
                longitude,
                shelter,
            } => {
                self.ensure_visible(FormKind::Member)?;
                self.member_form = MemberForm {
                    name,
                    shelter: shelter.unwrap_or_default(),
                    latitude,
                    longitude,
                };
                let member = self.member_form.submit(&mut self.roster, &self.rules)?;
                writeln!(out, "added member {} ({})", member.id, member.name)?;
            }
            SessionCommand::Shelter {
                name,
                latitude,
                longitude,
            } => {
                self.ensure_visible(FormKind::Shelter)?;
                self.shelter_form = ShelterForm {
                    name,
                    latitude,
                    longitude,
                };
                let shelter = self.shelter_form.submit(&mut self.roster, &self.rules)?;
                writeln!(out, "added shelter {} ({})", shelter.id, shelter.name)?;
            }
            SessionCommand::Toggle { id } => {
                let id = MemberId::new(id);
                if self.roster.toggle_safe(id).is_some() {
                    if let Some(member) = self.roster.member(id) {
                        writeln!(out, "{} is now {}", member.name, member.status_label())?;
                    }
                } else {
                    writeln!(out, "no member with id {id}")?;
                }
            }
            SessionCommand::Remove { id } => {
                let id = MemberId::new(id);
                match self.roster.remove_member(id) {
                    Some(member) => writeln!(out, "removed {}", member.name)?,
                    None => writeln!(out, "no member with id {id}")?,
                }
            }
            SessionCommand::List => {
                for row in self.map.member_list(&self.roster) {
                    writeln!(out, "{row}")?;
                }
            }
            SessionCommand::Markers => {
                for marker in self.map.markers(&self.roster) {
                    writeln!(out, "{}", marker.tooltip)?;
                }
            }
            SessionCommand::Geojson => {
                let geojson = self.map.to_geojson(&self.roster)?;
                writeln!(out, "{}", serde_json::to_string_pretty(&geojson)?)?;
            }
            SessionCommand::Stats => {
                let stats = self.roster.stats();
                writeln!(
                    out,
                    "members: {} (safe {}, missing {}), shelters: {}",
                    stats.total_members,
                    stats.safe_members,
                    stats.missing_members,
                    stats.total_shelters
                )?;
            }
            SessionCommand::Form { which } => {
                let kind = FormKind::from(which);
                self.map.toggle_form(kind);
                writeln!(out, "[{}]", self.map.toggle_label(kind))?;
            }
            SessionCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Final roster as JSON: members, shelters and counts.
    #[must_use]
    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::json!({
            "members": self.roster.members(),
            "shelters": self.roster.shelters(),
            "stats": self.roster.stats(),
        })
    }

    /// Run a whole script and print the resulting roster.
    ///
    /// In JSON mode the per-command output is discarded and `out` receives
    /// only the snapshot, so it stays a single JSON document. Otherwise the
    /// command output is followed by the member list.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the script or writing output fails.
    pub fn run_script<R: BufRead, W: Write>(&mut self, script: R, out: &mut W, json: bool) -> Result<()> {
        if json {
            self.run(script, &mut std::io::sink(), false)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&self.snapshot())?)?;
            return Ok(());
        }

        self.run(script, out, false)?;
        writeln!(out)?;
        writeln!(out, "Member List")?;
        writeln!(out, "-----------")?;
        for row in self.map.member_list(&self.roster) {
            writeln!(out, "{row}")?;
        }
        Ok(())
    }

    fn ensure_visible(&self, form: FormKind) -> Result<()> {
        if self.map.is_form_visible(form) {
            Ok(())
        } else {
            Err(Error::FormHidden(form))
        }
    }
}

/// Split a line into words, keeping double-quoted runs together.
fn split_words(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quoted {
        return Err(Error::invalid_command("unterminated quote"));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
