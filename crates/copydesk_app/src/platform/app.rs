use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use copydesk_core::{
    update, AppState, AppViewModel, Intent, JobStatus, Msg, ResultViewModel, Route,
};
use copydesk_logging::{desk_debug, desk_info};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::ui::input::{
    parse_candidate, parse_index, parse_intent, parse_intent_list, LineInput, WatchKey, WATCH_HELP,
};
use super::ui::render::{format_authors, format_intents, format_jobs, format_voices, Renderer};
use crate::cli::{AuthorsAction, Command};

const PUMP_SLICE: Duration = Duration::from_millis(75);
/// Slack on top of the request timeout before a wait is abandoned.
const WAIT_SLACK: Duration = Duration::from_secs(5);

pub fn run(command: Command, config: AppConfig) -> anyhow::Result<()> {
    let mut session = Session::start(&config)?;
    let outcome = match command {
        Command::Wizard => wizard(&mut session),
        Command::Titles { keywords } => titles(&mut session, keywords),
        Command::Authors { action } => authors(&mut session, action),
        Command::Voices { author } => voices(&mut session, author),
        Command::Start {
            title,
            author,
            voice,
            intent,
            secondary,
            no_watch,
        } => start(
            &mut session,
            StartArgs {
                title,
                author,
                voice,
                intent,
                secondary,
                no_watch,
            },
        ),
        Command::Watch { job_id } => {
            session.dispatch(Msg::Navigate(Route::result(job_id)));
            watch(&mut session, &mut LineInput::spawn(), false);
            Ok(())
        }
    };
    session.shutdown();
    outcome
}

/// Front-end half of the application: owns the state, feeds it messages in
/// order, hands effects to the engine and prints whatever changed.
struct Session {
    state: AppState,
    runner: EffectRunner,
    msg_rx: mpsc::Receiver<Msg>,
    renderer: Renderer,
    wait_limit: Duration,
}

impl Session {
    fn start(config: &AppConfig) -> anyhow::Result<Self> {
        let (msg_tx, msg_rx) = mpsc::channel();
        let runner = EffectRunner::new(config.engine_settings(), msg_tx)
            .context("failed to start the pipeline client")?;
        let mut session = Self {
            state: AppState::new(),
            runner,
            msg_rx,
            renderer: Renderer::new(),
            wait_limit: config.request_timeout + WAIT_SLACK,
        };
        session.render();
        Ok(session)
    }

    fn dispatch(&mut self, msg: Msg) {
        desk_debug!("msg {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        self.runner.enqueue(effects);
        if was_dirty {
            self.render();
        }
    }

    fn render(&mut self) {
        for line in self.renderer.render(&self.state.view()) {
            println!("{line}");
        }
    }

    fn view(&self) -> AppViewModel {
        self.state.view()
    }

    /// Handles engine messages for up to `wait`.
    fn pump(&mut self, wait: Duration) {
        let deadline = Instant::now() + wait;
        loop {
            let now = Instant::now();
            if now >= deadline {
                return;
            }
            match self.msg_rx.recv_timeout(deadline - now) {
                Ok(msg) => self.dispatch(msg),
                Err(RecvTimeoutError::Timeout) => return,
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }
    }

    /// Handles engine messages until `done` holds; false when the wait limit ran out.
    fn run_until(&mut self, done: impl Fn(&AppViewModel) -> bool) -> bool {
        let deadline = Instant::now() + self.wait_limit;
        while !done(&self.view()) {
            if Instant::now() >= deadline {
                return false;
            }
            self.pump(PUMP_SLICE);
        }
        true
    }

    fn shutdown(self) {
        self.runner.shutdown();
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}

fn titles(session: &mut Session, keywords: Vec<String>) -> anyhow::Result<()> {
    session.dispatch(Msg::KeywordsChanged(keywords.join("\n")));
    session.dispatch(Msg::GenerateTitlesClicked);
    if !session.run_until(|view| !view.titles.loading) {
        bail!("no answer from the title service");
    }
    if session.view().titles.quadrants.is_empty() {
        bail!("no titles were generated");
    }
    Ok(())
}

fn authors(session: &mut Session, action: Option<AuthorsAction>) -> anyhow::Result<()> {
    match action {
        None => {
            session.dispatch(Msg::ReloadAuthorsClicked);
            if !session.run_until(|view| !view.structure.loading_authors) {
                bail!("no answer from the author service");
            }
        }
        Some(AuthorsAction::Add { name, description }) => {
            session.dispatch(Msg::AddAuthorSubmitted { name, description });
            if !session.run_until(|view| {
                !view.structure.adding_author && !view.structure.loading_voices
            }) {
                bail!("no answer from the author service");
            }
        }
    }
    print_lines(format_authors(&session.view().structure.authors));
    Ok(())
}

fn voices(session: &mut Session, author: String) -> anyhow::Result<()> {
    session.dispatch(Msg::AuthorSelected(author));
    if !session.run_until(|view| !view.structure.loading_voices) {
        bail!("no answer from the voice service");
    }
    let view = session.view();
    print_lines(format_voices(&view.structure.voices, None));
    Ok(())
}

struct StartArgs {
    title: String,
    author: String,
    voice: String,
    intent: String,
    secondary: Vec<String>,
    no_watch: bool,
}

fn start(session: &mut Session, args: StartArgs) -> anyhow::Result<()> {
    let primary: Intent = args.intent.parse().map_err(anyhow::Error::msg)?;
    let mut secondary = Vec::new();
    for key in &args.secondary {
        let intent: Intent = key.parse().map_err(anyhow::Error::msg)?;
        if !secondary.contains(&intent) {
            secondary.push(intent);
        }
    }

    session.dispatch(Msg::Navigate(Route::structure(args.title)));
    if !session.view().structure.title_valid {
        bail!("title must be 1 to 120 characters");
    }
    session.dispatch(Msg::AuthorSelected(args.author));
    session.dispatch(Msg::VoiceSelected(args.voice));
    session.dispatch(Msg::PrimaryIntentSelected(primary));
    for intent in secondary {
        session.dispatch(Msg::SecondaryIntentToggled(intent));
    }
    session.dispatch(Msg::SubmitClicked);
    session.run_until(|view| !view.structure.submitting);

    let Some(job_id) = session.view().route.job_id().map(str::to_string) else {
        bail!("the job was not started");
    };
    desk_info!("started job {}", job_id);
    if args.no_watch {
        println!("{job_id}");
        return Ok(());
    }
    watch(session, &mut LineInput::spawn(), false);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

fn wizard(session: &mut Session) -> anyhow::Result<()> {
    let mut input = LineInput::spawn();
    loop {
        let flow = match session.view().route {
            Route::Titles { .. } => title_step(session, &mut input),
            Route::Structure { .. } => structure_step(session, &mut input),
            Route::Result { .. } => watch(session, &mut input, true),
        };
        if flow == Flow::Quit {
            return Ok(());
        }
    }
}

fn title_step(session: &mut Session, input: &mut LineInput) -> Flow {
    let current = session.view().titles.selected_title;
    if !current.is_empty() {
        let Some(line) = input.prompt(&format!(
            "title [{current}] (Enter keeps it, `new` for new keywords): "
        )) else {
            return Flow::Quit;
        };
        match line.as_str() {
            "" => {
                session.dispatch(Msg::TitleNextClicked);
                return Flow::Continue;
            }
            "new" => {}
            own => {
                session.dispatch(Msg::TitleEdited(own.to_string()));
                session.dispatch(Msg::TitleNextClicked);
                return Flow::Continue;
            }
        }
    }

    println!("keywords, one per line; empty line to generate:");
    let mut keywords = Vec::new();
    loop {
        match input.prompt("> ") {
            None => return Flow::Quit,
            Some(line) if line.is_empty() => break,
            Some(line) => keywords.push(line),
        }
    }
    session.dispatch(Msg::KeywordsChanged(keywords.join("\n")));
    session.dispatch(Msg::GenerateTitlesClicked);
    session.run_until(|view| !view.titles.loading);
    if session.view().titles.quadrants.is_empty() {
        return Flow::Continue;
    }

    let Some(line) =
        input.prompt("pick a title (e.g. 1.2), type your own, or Enter to start over: ")
    else {
        return Flow::Quit;
    };
    if line.is_empty() {
        session.dispatch(Msg::TitleEdited(String::new()));
        return Flow::Continue;
    }
    match parse_candidate(&line) {
        Some((quadrant, index)) => {
            session.dispatch(Msg::TitleCandidateSelected { quadrant, index })
        }
        None => session.dispatch(Msg::TitleEdited(line)),
    }
    session.dispatch(Msg::TitleNextClicked);
    Flow::Continue
}

fn structure_step(session: &mut Session, input: &mut LineInput) -> Flow {
    let view = session.view();
    if !view.structure.title_valid {
        println!("the title is missing or too long; going back to step 1");
        session.dispatch(Msg::BackToTitlesClicked);
        return Flow::Continue;
    }
    session.run_until(|view| !view.structure.loading_authors);

    // Author
    loop {
        let authors = session.view().structure.authors;
        print_lines(format_authors(&authors));
        let Some(line) =
            input.prompt("author number, `+` to add one, `r` to reload, `b` to go back: ")
        else {
            return Flow::Quit;
        };
        match line.as_str() {
            "b" => {
                session.dispatch(Msg::BackToTitlesClicked);
                return Flow::Continue;
            }
            "r" => {
                session.dispatch(Msg::ReloadAuthorsClicked);
                session.run_until(|view| !view.structure.loading_authors);
            }
            "+" => {
                let Some(name) = input.prompt("name: ") else {
                    return Flow::Quit;
                };
                let Some(description) = input.prompt("description (optional): ") else {
                    return Flow::Quit;
                };
                session.dispatch(Msg::AddAuthorSubmitted {
                    name,
                    description: Some(description),
                });
                session.run_until(|view| !view.structure.adding_author);
                if session.view().structure.author.is_some() {
                    break;
                }
            }
            choice => match parse_index(choice, authors.len()) {
                Some(index) => {
                    session.dispatch(Msg::AuthorSelected(authors[index].name.clone()));
                    break;
                }
                None => println!("no such author"),
            },
        }
    }

    // Voice
    session.run_until(|view| !view.structure.loading_voices);
    let structure = session.view().structure;
    if structure.voices.is_empty() {
        let Some(line) = input.prompt("voice (this author has none listed, type one): ") else {
            return Flow::Quit;
        };
        session.dispatch(Msg::VoiceSelected(line));
    } else {
        print_lines(format_voices(&structure.voices, structure.voice.as_deref()));
        let Some(line) = input.prompt("voice number (Enter keeps the marked one): ") else {
            return Flow::Quit;
        };
        if let Some(index) = parse_index(&line, structure.voices.len()) {
            session.dispatch(Msg::VoiceSelected(structure.voices[index].clone()));
        }
    }

    // Intents
    print_lines(format_intents());
    loop {
        let Some(line) = input.prompt("primary intent (number or key): ") else {
            return Flow::Quit;
        };
        if let Some(intent) = parse_intent(&line) {
            session.dispatch(Msg::PrimaryIntentSelected(intent));
            break;
        }
        println!("unknown intent");
    }
    let Some(line) = input.prompt("secondary intents (optional, comma separated): ") else {
        return Flow::Quit;
    };
    let (wanted, unknown) = parse_intent_list(&line);
    if !unknown.is_empty() {
        println!("ignoring unknown intents: {}", unknown.join(", "));
    }
    let current = session.view().structure.secondary_intents;
    for intent in Intent::ALL {
        if wanted.contains(&intent) != current.contains(&intent) {
            session.dispatch(Msg::SecondaryIntentToggled(intent));
        }
    }

    session.dispatch(Msg::SubmitClicked);
    session.run_until(|view| !view.structure.submitting);
    Flow::Continue
}

fn is_settled(result: &ResultViewModel) -> bool {
    match result.status {
        JobStatus::Error => true,
        JobStatus::Done => result.final_a.is_some() && !result.loading_result,
        JobStatus::Pending | JobStatus::Running => false,
    }
}

/// Result view loop. Standalone watches end on `q`, on reconfigure, or once the
/// job settled and stdin is closed.
fn watch(session: &mut Session, input: &mut LineInput, in_wizard: bool) -> Flow {
    println!("{WATCH_HELP}");
    loop {
        session.pump(PUMP_SLICE);
        let view = session.view();
        let Some(result) = view.result.as_ref() else {
            // Reconfigure moved us to the structure step.
            if in_wizard {
                return Flow::Continue;
            }
            println!("left the result view for {}", view.location);
            return Flow::Quit;
        };
        if input.is_closed() && is_settled(result) && view.pending_exports == 0 {
            return Flow::Quit;
        }

        let Some(line) = input.try_line() else {
            continue;
        };
        match WatchKey::parse(&line) {
            Some(WatchKey::TogglePolling) => session.dispatch(Msg::PollingToggled),
            Some(WatchKey::RefreshResult) => session.dispatch(Msg::RefreshResultClicked),
            Some(WatchKey::Download(variant)) => session.dispatch(Msg::DownloadClicked(variant)),
            Some(WatchKey::Reconfigure) => session.dispatch(Msg::ReconfigureClicked),
            Some(WatchKey::ListJobs) => print_lines(format_jobs(&view.jobs)),
            Some(WatchKey::OpenJob(index)) => match view.jobs.get(index) {
                Some(job) => session.dispatch(Msg::JobSelected {
                    job_id: job.job_id.clone(),
                }),
                None => println!("no such job"),
            },
            Some(WatchKey::Quit) => {
                session.dispatch(Msg::Navigate(Route::home()));
                return Flow::Quit;
            }
            None if line.is_empty() => {}
            None => println!("{WATCH_HELP}"),
        }
    }
}
