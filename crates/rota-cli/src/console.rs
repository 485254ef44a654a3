//! Line-oriented console over a [`rota_core::ChoreBoard`].
//!
//! Tasks are referenced by their 1-based position on the board or by name
//! (case-insensitive, may contain spaces). A weekday token separates the
//! task reference from the rest of the line. The longest board name followed
//! by a weekday wins, so names that contain a weekday still resolve:
//!
//! ```text
//! claim bathroom 1 tue
//! claim patio sun deck sat
//! complete 3 monday content://photos/42
//! reject Kitchen mon grease on the stove
//! ```

use std::collections::HashMap;
use std::fmt::Write as _;

use anyhow::{Context, Result, anyhow, bail};
use rota_core::domain::{Command, Task};
use rota_core::{App, Role, TaskId, User, Weekday};

pub const HELP: &str = "\
commands:
  login <name>                    sign in ('admin' reviews, anyone else is a tenant)
  board [json]                    show the week's board
  claim <task> <day>              take a slot
  complete <task> <day> <photo>   submit proof for your slot
  approve <task> <day>            accept submitted proof (admin)
  reject <task> <day> <comment>   send proof back (admin)
  release <task> <day>            free a slot (claimant or admin)
  pending                         slots waiting for review
  points                          approved points per person
  edit                            toggle edit mode
  week [label]                    show or set the week label
  help                            this text
  quit                            leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Login(String),
    Board { json: bool },
    Claim { task: String, day: Weekday },
    Complete { task: String, day: Weekday, photo: String },
    Approve { task: String, day: Weekday },
    Reject { task: String, day: Weekday, comment: String },
    Release { task: String, day: Weekday },
    Pending,
    Points,
    Edit,
    Week(Option<String>),
    Help,
    Quit,
}

/// Parse one console line. Blank lines yield `None`.
fn parse_with(line: &str, is_task: &dyn Fn(&str) -> bool) -> Result<Option<Input>> {
    let line = line.trim();
    let Some((head, rest)) = split_word(line) else {
        return Ok(None);
    };

    let input = match head.to_ascii_lowercase().as_str() {
        "login" => {
            if rest.is_empty() {
                bail!("usage: login <name>");
            }
            Input::Login(rest.to_string())
        }
        "board" => match rest {
            "" => Input::Board { json: false },
            "json" => Input::Board { json: true },
            other => bail!("unknown board format '{other}'"),
        },
        "claim" => {
            let (task, day, _) = slot(rest, false, is_task)?;
            Input::Claim { task, day }
        }
        "complete" => {
            let (task, day, photo) = slot(rest, true, is_task)?;
            Input::Complete { task, day, photo }
        }
        "approve" => {
            let (task, day, _) = slot(rest, false, is_task)?;
            Input::Approve { task, day }
        }
        "reject" => {
            let (task, day, comment) = slot(rest, true, is_task)?;
            Input::Reject { task, day, comment }
        }
        "release" => {
            let (task, day, _) = slot(rest, false, is_task)?;
            Input::Release { task, day }
        }
        "pending" => Input::Pending,
        "points" => Input::Points,
        "edit" => Input::Edit,
        "week" => Input::Week((!rest.is_empty()).then(|| rest.to_string())),
        "help" | "?" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => bail!("unknown command '{other}' (try 'help')"),
    };
    Ok(Some(input))
}

fn split_word(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => Some((word, rest.trim())),
        None => Some((s, "")),
    }
}

/// `<task words...> <day> [tail...]`
fn slot(
    args: &str,
    needs_tail: bool,
    is_task: &dyn Fn(&str) -> bool,
) -> Result<(String, Weekday, String)> {
    let words: Vec<&str> = args.split_whitespace().collect();
    let days: Vec<(usize, Weekday)> = words
        .iter()
        .enumerate()
        .skip(1)
        .filter_map(|(i, w)| w.parse::<Weekday>().ok().map(|day| (i, day)))
        .collect();
    let (pos, day) = days
        .iter()
        .rev()
        .find(|(i, _)| is_task(&words[..*i].join(" ")))
        .or_else(|| days.first())
        .copied()
        .ok_or_else(|| anyhow!("expected <task> <day>, got '{args}'"))?;

    let task = words[..pos].join(" ");
    let tail = words[pos + 1..].join(" ");
    match (needs_tail, tail.is_empty()) {
        (true, true) => bail!("missing text after the day"),
        (false, false) => bail!("unexpected '{tail}' after the day"),
        _ => Ok((task, day, tail)),
    }
}

pub struct Session {
    app: App,
    users: HashMap<String, User>,
    current: Option<User>,
}

impl Session {
    pub fn new(app: App) -> Self {
        Self {
            app,
            users: HashMap::new(),
            current: None,
        }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    /// Parse a line, matching task names against the current board.
    pub fn parse(&self, line: &str) -> Result<Option<Input>> {
        let snapshot = self.app.board.snapshot();
        parse_with(line, &|name| snapshot.task_by_name(name).is_some())
    }

    /// Run one parsed input and return the text to print.
    pub fn execute(&mut self, input: Input) -> Result<String> {
        let board = &self.app.board;
        let out = match input {
            Input::Login(name) => {
                let user = self.login(&name);
                format!("signed in as {} ({:?})", user.name, user.role)
            }
            Input::Board { json: true } => serde_json::to_string_pretty(&*board.snapshot())
                .context("encode board as json")?,
            Input::Board { json: false } => self.render_board(),
            Input::Claim { task, day } => {
                let actor = self.actor()?.clone();
                let task = self.resolve(&task)?;
                self.submit(&actor, Command::Claim { task, day, user: actor.clone() })?
            }
            Input::Complete { task, day, photo } => {
                let task = self.resolve(&task)?;
                self.submit(&self.actor()?.clone(), Command::Complete { task, day, photo })?
            }
            Input::Approve { task, day } => {
                let task = self.resolve(&task)?;
                self.submit(&self.actor()?.clone(), Command::Approve { task, day })?
            }
            Input::Reject { task, day, comment } => {
                let task = self.resolve(&task)?;
                self.submit(&self.actor()?.clone(), Command::Reject { task, day, comment })?
            }
            Input::Release { task, day } => {
                let task = self.resolve(&task)?;
                self.submit(&self.actor()?.clone(), Command::Release { task, day })?
            }
            Input::Pending => self.render_pending(),
            Input::Points => self.render_points(),
            Input::Edit => {
                let on = board.toggle_edit_mode();
                format!("edit mode {}", if on { "on" } else { "off" })
            }
            Input::Week(Some(label)) => {
                board.set_week_label(label);
                board.week_label()
            }
            Input::Week(None) => board.week_label(),
            Input::Help => HELP.to_string(),
            Input::Quit => String::new(),
        };
        Ok(out)
    }

    /// Stub sign-in: "admin" is the reviewer, any other name a tenant.
    /// The same name always maps to the same user.
    fn login(&mut self, name: &str) -> User {
        let key = name.trim().to_lowercase();
        let role = if key == "admin" { Role::Admin } else { Role::Tenant };
        let user = self
            .users
            .entry(key)
            .or_insert_with(|| self.app.user(name.trim(), role))
            .clone();
        self.current = Some(user.clone());
        user
    }

    fn actor(&self) -> Result<&User> {
        self.current.as_ref().context("not signed in (use 'login <name>')")
    }

    fn resolve(&self, reference: &str) -> Result<TaskId> {
        let snapshot = self.app.board.snapshot();
        let task = match reference.parse::<usize>() {
            Ok(n) => n.checked_sub(1).and_then(|i| snapshot.tasks().get(i)),
            Err(_) => snapshot.task_by_name(reference),
        };
        task.map(|t| t.id)
            .ok_or_else(|| anyhow!("no task '{reference}' on the board"))
    }

    fn submit(&self, actor: &User, command: Command) -> Result<String> {
        let action = command.action();
        let day = command.day();
        let applied = self.app.board.submit_as(actor, command)?;
        Ok(format!("{} {} ok (v{})", action.verb(), day, applied.version))
    }

    fn render_board(&self) -> String {
        let board = &self.app.board;
        let snapshot = board.snapshot();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{}  (v{}{})",
            board.week_label(),
            snapshot.version,
            if board.edit_mode() { ", editing" } else { "" }
        );
        for (i, task) in snapshot.tasks().iter().enumerate() {
            render_task(&mut out, i + 1, task);
        }
        out.trim_end().to_string()
    }

    fn render_pending(&self) -> String {
        let pending = self.app.board.pending_approvals();
        if pending.is_empty() {
            return "nothing to review".to_string();
        }
        let mut out = String::new();
        for p in pending {
            let _ = writeln!(
                out,
                "{} {}: {} [{}]",
                p.task.name,
                p.day.short_name(),
                p.assignment.claimant_name,
                p.assignment.photo.as_deref().unwrap_or("-"),
            );
        }
        out.trim_end().to_string()
    }

    fn render_points(&self) -> String {
        let summary = self.app.board.points_by_user();
        if summary.is_empty() {
            return "no claims yet".to_string();
        }
        let mut out = String::new();
        for s in summary {
            let _ = writeln!(
                out,
                "{:<12} {:>4} pts  ({} approved, {} pending)",
                s.user_name, s.points, s.approved, s.pending
            );
        }
        out.trim_end().to_string()
    }
}

fn render_task(out: &mut String, position: usize, task: &Task) {
    let _ = writeln!(
        out,
        "{position:>2}. {} [{}/{}] {} pts",
        task.name,
        task.occupied(),
        task.capacity,
        task.points
    );
    for (day, a) in &task.assignments {
        let _ = write!(out, "      {} {:<12} {}", day.short_name(), a.claimant_name, a.status);
        if let Some(comment) = &a.rejection_comment {
            let _ = write!(out, " ({comment})");
        }
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rota_core::AppBuilder;
    use rota_core::domain::{Catalog, TaskSpec};
    use rstest::rstest;

    fn parse(line: &str) -> Result<Option<Input>> {
        parse_with(line, &|_| false)
    }

    fn session() -> Session {
        let app = AppBuilder::new()
            .catalog(Catalog::new(vec![
                TaskSpec::new("Kitchen", 1, 3),
                TaskSpec::new("Bathroom 1", 3, 3),
                TaskSpec::new("Patio sun deck", 2, 5),
            ]))
            .build()
            .unwrap();
        Session::new(app)
    }

    fn run(s: &mut Session, line: &str) -> Result<String> {
        match s.parse(line)? {
            Some(input) => s.execute(input),
            None => Ok(String::new()),
        }
    }

    #[rstest]
    #[case("claim kitchen mon", Input::Claim { task: "kitchen".into(), day: Weekday::Monday })]
    #[case("claim bathroom 1 tue", Input::Claim { task: "bathroom 1".into(), day: Weekday::Tuesday })]
    #[case(
        "complete 2 Friday content://p/1",
        Input::Complete { task: "2".into(), day: Weekday::Friday, photo: "content://p/1".into() }
    )]
    #[case(
        "reject Kitchen sun grease on the stove",
        Input::Reject { task: "Kitchen".into(), day: Weekday::Sunday, comment: "grease on the stove".into() }
    )]
    #[case("board json", Input::Board { json: true })]
    #[case("week", Input::Week(None))]
    #[case("QUIT", Input::Quit)]
    fn parses_console_lines(#[case] line: &str, #[case] expected: Input) {
        assert_eq!(parse(line).unwrap(), Some(expected));
    }

    #[rstest]
    #[case("claim kitchen")]
    #[case("claim mon")]
    #[case("complete kitchen mon")]
    #[case("approve kitchen mon extra")]
    #[case("dance")]
    fn rejects_malformed_lines(#[case] line: &str) {
        assert!(parse(line).is_err());
    }

    #[test]
    fn task_names_containing_a_weekday_resolve_by_name() {
        let mut s = session();
        assert_eq!(
            s.parse("claim patio sun deck sat").unwrap(),
            Some(Input::Claim { task: "patio sun deck".into(), day: Weekday::Saturday })
        );
        assert_eq!(
            s.parse("reject Patio Sun Deck mon redo by fri").unwrap(),
            Some(Input::Reject {
                task: "Patio Sun Deck".into(),
                day: Weekday::Monday,
                comment: "redo by fri".into(),
            })
        );

        run(&mut s, "login Ana").unwrap();
        run(&mut s, "claim patio sun deck sat").unwrap();
        assert!(run(&mut s, "board").unwrap().contains(" 3. Patio sun deck [1/2] 5 pts"));
    }

    #[test]
    fn kitchen_comment_mentioning_a_day_keeps_the_first_split() {
        let s = session();
        assert_eq!(
            s.parse("reject kitchen mon redo by fri").unwrap(),
            Some(Input::Reject {
                task: "kitchen".into(),
                day: Weekday::Monday,
                comment: "redo by fri".into(),
            })
        );
    }

    #[test]
    fn blank_line_is_ignored() {
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn commands_require_login() {
        let mut s = session();
        let err = run(&mut s, "claim kitchen mon").unwrap_err();
        assert!(err.to_string().contains("not signed in"));
    }

    #[test]
    fn full_review_cycle_through_the_console() {
        let mut s = session();
        run(&mut s, "login Ana").unwrap();
        assert_eq!(run(&mut s, "claim 1 mon").unwrap(), "claim Monday ok (v1)");
        run(&mut s, "complete kitchen mon p1").unwrap();

        run(&mut s, "login admin").unwrap();
        assert_eq!(run(&mut s, "pending").unwrap(), "Kitchen Mon: Ana [p1]");
        run(&mut s, "approve kitchen mon").unwrap();

        let points = run(&mut s, "points").unwrap();
        assert!(points.starts_with("Ana"));
        assert!(points.contains("3 pts"));
    }

    #[test]
    fn login_reuses_identity_by_name() {
        let mut s = session();
        run(&mut s, "login Ana").unwrap();
        let first = s.current_user().unwrap().id;
        run(&mut s, "login beto").unwrap();
        run(&mut s, "login ana").unwrap();
        assert_eq!(s.current_user().unwrap().id, first);
    }

    #[test]
    fn store_rejection_surfaces_as_error() {
        let mut s = session();
        run(&mut s, "login Ana").unwrap();
        run(&mut s, "claim kitchen mon").unwrap();
        run(&mut s, "login Beto").unwrap();

        let err = run(&mut s, "claim kitchen tue").unwrap_err();
        assert!(err.to_string().contains("is full"));
    }

    #[test]
    fn board_renders_text_and_json() {
        let mut s = session();
        run(&mut s, "login Ana").unwrap();
        run(&mut s, "claim bathroom 1 wed").unwrap();

        let text = run(&mut s, "board").unwrap();
        assert!(text.contains(" 2. Bathroom 1 [1/3] 3 pts"));
        assert!(text.contains("Wed Ana"));

        let json: serde_json::Value = serde_json::from_str(&run(&mut s, "board json").unwrap()).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["tasks"][1]["assignments"]["wednesday"]["status"], "taken");
    }

    #[test]
    fn unknown_task_reference_is_reported() {
        let mut s = session();
        run(&mut s, "login Ana").unwrap();
        assert!(run(&mut s, "claim 9 mon").is_err());
        assert!(run(&mut s, "claim garage mon").is_err());
    }

    #[test]
    fn edit_and_week_are_ui_state_only() {
        let mut s = session();
        assert_eq!(run(&mut s, "edit").unwrap(), "edit mode on");
        assert_eq!(run(&mut s, "week Week 13 Oct - 19 Oct").unwrap(), "Week 13 Oct - 19 Oct");
        assert!(run(&mut s, "board").unwrap().starts_with("Week 13 Oct - 19 Oct  (v0, editing)"));
    }
}
