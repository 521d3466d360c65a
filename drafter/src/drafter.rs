//! Drafter - drives a draft session from the command line.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use draft_config::DraftConfig;
use draft_core::{CandidatePool, DraftSession};
use mcts::{recommend, MctsConfig, SearchResult};
use tracing::{debug, info, warn};

use crate::config::Config;

pub struct Drafter {
    session: DraftSession,
    search: MctsConfig,
    history_path: Option<PathBuf>,
}

impl Drafter {
    /// Build the league from config, load candidates, and replay any saved history.
    pub fn new(config: &Config, central: &DraftConfig) -> Result<Self> {
        let model = central
            .draft
            .slot_model()
            .context("invalid [draft] slot configuration")?;
        let order = central
            .draft
            .pick_order(&model)
            .context("invalid [[draft.trades]] entry")?;
        let pool = CandidatePool::from_path(&model, &config.players)
            .with_context(|| format!("failed to load candidates from {}", config.players))?;

        info!(
            teams = model.num_teams(),
            slots = model.num_slots(),
            total_picks = model.total_picks(),
            candidates = pool.len(),
            "League loaded"
        );
        if pool.len() < model.total_picks() {
            warn!(
                candidates = pool.len(),
                total_picks = model.total_picks(),
                "Fewer candidates than picks, the draft cannot be completed"
            );
        }

        let session = DraftSession::new(model, pool, order);
        let mut drafter = Self::from_session(
            session,
            config.mcts_config(central.search.seed),
            config.history.clone(),
        );
        drafter.load_history()?;
        Ok(drafter)
    }

    pub fn from_session(
        session: DraftSession,
        search: MctsConfig,
        history_path: Option<PathBuf>,
    ) -> Self {
        Self {
            session,
            search,
            history_path,
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &DraftSession {
        &self.session
    }

    fn load_history(&mut self) -> Result<()> {
        let Some(path) = &self.history_path else {
            return Ok(());
        };
        if !path.exists() {
            debug!(path = %path.display(), "No history file yet, starting a fresh draft");
            return Ok(());
        }
        let file = File::open(path)
            .with_context(|| format!("failed to open history {}", path.display()))?;
        self.session
            .load_history(BufReader::new(file))
            .with_context(|| format!("failed to replay history {}", path.display()))?;
        info!(picks = self.session.pick_index(), "History replayed");
        Ok(())
    }

    fn save_history(&self) -> Result<()> {
        let Some(path) = &self.history_path else {
            return Ok(());
        };
        write_history(&self.session, path)
    }

    fn search(&self) -> Result<SearchResult> {
        let result = recommend(
            self.session.model(),
            self.session.pool(),
            self.session.order(),
            self.session.pick_index(),
            self.session.history(),
            self.search.clone(),
        )?;
        Ok(result)
    }

    /// Print a recommendation for the team on the clock.
    pub fn think(&self, out: &mut impl Write) -> Result<()> {
        let team = self
            .session
            .team_on_clock()
            .ok_or_else(|| anyhow!("the draft is complete"))?;
        let result = self.search()?;
        let slot = &self.session.model().slot(result.candidate.slot).name;
        writeln!(
            out,
            "Pick {}: team {} should take {} ({}, {:.1})",
            self.session.pick_index() + 1,
            team,
            result.candidate.name,
            slot,
            result.candidate.score
        )?;
        writeln!(
            out,
            "  expected share {:.1}% over {} visits ({} iterations, {} nodes, {:.2}s)",
            result.share * 100.0,
            result.visits,
            result.stats.iterations,
            result.stats.nodes,
            result.stats.elapsed.as_secs_f64()
        )?;
        Ok(())
    }

    /// Let the engine make every remaining pick, then print each roster.
    pub fn sim(&mut self, out: &mut impl Write) -> Result<()> {
        while let Some(team) = self.session.team_on_clock() {
            let pick = self.session.pick_index();
            let result = self.search()?;
            self.session.commit_id(result.candidate.id)?;
            writeln!(
                out,
                "{:>4}. team {:>2}  {}",
                pick + 1,
                team,
                result.candidate.name
            )?;
        }
        self.save_history()?;

        for team in 0..self.session.model().num_teams() {
            self.roster(Some(team), out)?;
        }
        Ok(())
    }

    /// Commit a pick by name and persist the history.
    pub fn pick(&mut self, name: &str, out: &mut impl Write) -> Result<()> {
        let pick = self.session.commit(name)?;
        self.save_history()?;
        writeln!(
            out,
            "Pick {}: team {} took {}",
            self.session.pick_index(),
            pick.team,
            name
        )?;
        Ok(())
    }

    /// Remove the last pick and persist the history.
    pub fn undo(&mut self, out: &mut impl Write) -> Result<()> {
        match self.session.undo()? {
            Some(pick) => {
                self.save_history()?;
                let name = self
                    .session
                    .pool()
                    .get(pick.candidate)
                    .map_or("?", |c| c.name.as_str());
                writeln!(out, "Undid team {} taking {}", pick.team, name)?;
            }
            None => writeln!(out, "No picks to undo")?,
        }
        Ok(())
    }

    /// List the best available candidates for a slot.
    pub fn pool(&self, slot: &str, limit: usize, out: &mut impl Write) -> Result<()> {
        let slot = self
            .session
            .model()
            .slot_by_name(slot)
            .ok_or_else(|| anyhow!("unknown slot '{slot}'"))?;
        for (rank, candidate) in self.session.available(slot.index, limit).iter().enumerate() {
            writeln!(
                out,
                "{:>3}. {:<28} {:>7.1}",
                rank + 1,
                candidate.name,
                candidate.score
            )?;
        }
        Ok(())
    }

    /// Print a team's roster and projected total.
    pub fn roster(&self, team: Option<usize>, out: &mut impl Write) -> Result<()> {
        let num_teams = self.session.model().num_teams();
        let team = team.or(self.session.team_on_clock()).unwrap_or(0);
        if team >= num_teams {
            return Err(anyhow!("team {team} out of range (league has {num_teams})"));
        }

        writeln!(out, "Team {team}")?;
        for entry in self.session.roster(team) {
            let Some(candidate) = self.session.pool().get(entry.candidate) else {
                continue;
            };
            writeln!(
                out,
                "  {:<6} {:<28} {:>7.1}  (pick {})",
                self.session.model().slot(entry.slot).name,
                candidate.name,
                candidate.score,
                entry.pick + 1
            )?;
        }
        writeln!(out, "  total {:.1}", self.session.team_score(team))?;
        Ok(())
    }
}

fn write_history(session: &DraftSession, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create history {}", path.display()))?;
    session.save_history(BufWriter::new(file))?;
    debug!(path = %path.display(), picks = session.pick_index(), "History saved");
    Ok(())
}
