//! Interactive line-based session over the store and controllers.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tokio::task::JoinSet;

use opinions_core::domain::{FormDraft, OpinionId};
use opinions_core::{OpinionFormController, SubmitOutcome, VoteController, VoteDirection};

use crate::render::{self, FeedEntry};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    List,
    New,
    Vote(usize, VoteDirection),
    Reload,
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
enum CommandError {
    #[error("Unknown command `{0}`. Type `help` for the list.")]
    Unknown(String),

    #[error("`{0}` needs an opinion number, e.g. `{0} 1`.")]
    MissingIndex(&'static str),

    #[error("`{0}` is not an opinion number.")]
    BadIndex(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default();

        let vote = |verb: &'static str, direction, arg: Option<&str>| {
            let arg = arg.ok_or(CommandError::MissingIndex(verb))?;
            arg.parse::<usize>()
                .map(|n| Command::Vote(n, direction))
                .map_err(|_| CommandError::BadIndex(arg.to_string()))
        };

        match name.to_lowercase().as_str() {
            "list" | "ls" => Ok(Command::List),
            "new" => Ok(Command::New),
            "up" => vote("up", VoteDirection::Up, words.next()),
            "down" => vote("down", VoteDirection::Down, words.next()),
            "reload" => Ok(Command::Reload),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(name.to_string())),
        }
    }
}

pub struct Session {
    state: AppState,
    form: OpinionFormController,
    votes: HashMap<OpinionId, VoteController>,
    in_flight: JoinSet<()>,
}

impl Session {
    pub fn new(state: AppState) -> Self {
        let form = OpinionFormController::new(state.store.clone(), state.policy);
        Self {
            state,
            form,
            votes: HashMap::new(),
            in_flight: JoinSet::new(),
        }
    }

    /// Render the feed, then execute commands until `quit` or end of input.
    /// Votes still in flight are awaited before returning.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        self.write_feed(&mut output).await?;

        loop {
            output.write_all(b"> ").await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command, &mut lines, &mut output).await?,
                Err(e) => write_line(&mut output, &e.to_string()).await?,
            }
        }

        output.flush().await?;
        self.settle_votes().await;
        Ok(())
    }

    async fn settle_votes(&mut self) {
        if !self.in_flight.is_empty() {
            tracing::debug!(count = self.in_flight.len(), "Waiting for votes in flight");
        }
        while let Some(result) = self.in_flight.join_next().await {
            if let Err(e) = result {
                tracing::warn!(error = %e, "Vote task failed");
            }
        }
    }

    async fn execute<R, W>(
        &mut self,
        command: Command,
        lines: &mut Lines<R>,
        output: &mut W,
    ) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        match command {
            Command::List => self.write_feed(output).await,
            Command::Reload => {
                self.state.store.load().await;
                self.write_feed(output).await
            }
            Command::Help => write_line(output, render::HELP).await,
            Command::New => self.new_opinion(lines, output).await,
            Command::Vote(n, direction) => self.vote(n, direction, output).await,
            Command::Quit => Ok(()),
        }
    }

    async fn new_opinion<R, W>(&mut self, lines: &mut Lines<R>, output: &mut W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let view = self.form.view().await;
        output.write_all(render::render_form(&view).as_bytes()).await?;
        let previous = view.values;
        self.form.edit(previous.clone()).await;

        let Some(user_name) = ask(lines, output, "Your Name", &previous.user_name).await? else {
            return Ok(());
        };
        let Some(title) = ask(lines, output, "Title", &previous.title).await? else {
            return Ok(());
        };
        let Some(body) = ask(lines, output, "Your Opinion", &previous.body).await? else {
            return Ok(());
        };

        match self.form.submit(FormDraft::new(user_name, title, body)).await {
            SubmitOutcome::Rejected(_) => {
                let view = self.form.view().await;
                output.write_all(render::render_form(&view).as_bytes()).await?;
                write_line(output, "Type `new` to fix your opinion.").await
            }
            SubmitOutcome::Submitted(created) => {
                if let Some(opinion) = created {
                    tracing::debug!(id = %opinion.id, "Opinion shared from terminal");
                }
                self.write_feed(output).await
            }
            SubmitOutcome::Busy => {
                write_line(output, "Your previous opinion is still being submitted.").await
            }
        }
    }

    async fn vote<W>(&mut self, n: usize, direction: VoteDirection, output: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let snapshot = self.state.store.snapshot();
        let Some(opinion) = n.checked_sub(1).and_then(|i| snapshot.opinions.get(i)) else {
            return write_line(output, &format!("There is no opinion number {n}.")).await;
        };

        let controller = self.controller(&opinion.id);
        match controller.start(direction).await {
            Some(request) => {
                while self.in_flight.try_join_next().is_some() {}
                self.in_flight.spawn(async move {
                    let outcome = request.send().await;
                    tracing::debug!(?outcome, "Vote settled");
                });
            }
            None => {
                write_line(output, "Still sending your last vote on that opinion.").await?;
            }
        }

        self.write_feed(output).await
    }

    fn controller(&mut self, id: &OpinionId) -> VoteController {
        let store = &self.state.store;
        let policy = self.state.policy;
        self.votes
            .entry(id.clone())
            .or_insert_with(|| VoteController::new(store.clone(), id.clone(), policy))
            .clone()
    }

    async fn write_feed<W>(&mut self, output: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let snapshot = self.state.store.snapshot();

        let live: HashSet<&OpinionId> = snapshot.opinions.iter().map(|o| &o.id).collect();
        self.votes.retain(|id, _| live.contains(id));

        let mut controls = Vec::with_capacity(snapshot.len());
        for opinion in snapshot.opinions.iter() {
            let controller = self.controller(&opinion.id);
            controls.push((
                controller.displayed_votes().await,
                controller.is_pending().await,
            ));
        }

        let entries: Vec<FeedEntry<'_>> = snapshot
            .opinions
            .iter()
            .zip(controls)
            .map(|(opinion, (displayed_votes, pending))| FeedEntry {
                opinion,
                displayed_votes,
                pending,
            })
            .collect();

        output
            .write_all(render::render_feed(&entries).as_bytes())
            .await?;
        Ok(())
    }
}

/// Prompt for one field. An empty answer keeps the echoed value; `None` on
/// end of input.
async fn ask<R, W>(
    lines: &mut Lines<R>,
    output: &mut W,
    label: &str,
    previous: &str,
) -> anyhow::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output
        .write_all(render::prompt(label, previous).as_bytes())
        .await?;
    output.flush().await?;

    let Some(answer) = lines.next_line().await? else {
        return Ok(None);
    };
    if answer.trim().is_empty() && !previous.is_empty() {
        return Ok(Some(previous.to_string()));
    }
    Ok(Some(answer))
}

async fn write_line<W>(output: &mut W, text: &str) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    Ok(())
}
