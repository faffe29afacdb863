//! Intent queue and the commit step that turns intents into orders.

use warden_core::{Action, Agent, AgentSnapshot};

/// Actions queued by the planner passes of one turn, in submission order.
#[derive(Debug, Default)]
pub struct ActionQueue {
    pending: Vec<Action>,
}

/// Outcome of folding a turn's queue into the roster.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommitReport {
    /// Every roster agent, in roster order, with its committed command.
    pub agents: Vec<Agent>,
    /// Actions that were refused, in submission order.
    pub discarded: Vec<Action>,
}

impl ActionQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an action.
    pub fn push(&mut self, action: Action) {
        self.pending.push(action);
    }

    /// Number of queued actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing has been queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Whether an action is already queued for the roster slot.
    #[must_use]
    pub fn is_assigned(&self, agent: usize) -> bool {
        self.pending.iter().any(|action| action.agent == agent)
    }

    /// Queued actions in submission order.
    pub fn iter(&self) -> impl Iterator<Item = &Action> + '_ {
        self.pending.iter()
    }

    /// Commits the queue against `roster` and empties it.
    ///
    /// The first action queued for an agent wins. Later actions for the same
    /// agent and actions naming a slot outside the roster are discarded with a
    /// warning. Agents that received nothing hold in place.
    pub fn commit(&mut self, roster: &[AgentSnapshot]) -> CommitReport {
        let mut agents: Vec<Agent> = roster.iter().copied().map(Agent::new).collect();
        let mut discarded = Vec::new();

        for action in self.pending.drain(..) {
            let Some(agent) = agents.get_mut(action.agent) else {
                tracing::warn!(
                    slot = action.agent,
                    roster = roster.len(),
                    command = %action.command,
                    "discarding action for a slot outside the roster"
                );
                discarded.push(action);
                continue;
            };

            if agent.has_order() {
                tracing::warn!(
                    agent = %agent.snapshot().id,
                    command = %action.command,
                    "discarding second action queued for the same agent"
                );
                discarded.push(action);
                continue;
            }

            tracing::debug!(
                agent = %agent.snapshot().id,
                command = %action.command,
                note = action.note.unwrap_or_default(),
                "action committed"
            );
            agent.issue(action.command, action.note);
        }

        CommitReport { agents, discarded }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::{Command, EntityId, Point};

    fn roster(count: u32) -> Vec<AgentSnapshot> {
        (0..count)
            .map(|id| AgentSnapshot {
                id: EntityId::new(id),
                position: Point::ZERO,
                shield: 0,
                controlled: false,
                health: 0,
            })
            .collect()
    }

    fn walk(agent: usize, x: i32) -> Action {
        Action::new(
            agent,
            Command::Move {
                destination: Point::new(x, 0),
            },
        )
    }

    #[test]
    fn first_action_per_agent_wins() {
        let mut queue = ActionQueue::new();
        queue.push(walk(1, 10));
        queue.push(walk(1, 20));
        queue.push(walk(0, 30));

        let report = queue.commit(&roster(2));
        assert!(queue.is_empty());
        assert_eq!(report.agents[1].order().to_string(), "MOVE 10 0");
        assert_eq!(report.agents[0].order().to_string(), "MOVE 30 0");
        assert_eq!(report.discarded, vec![walk(1, 20)]);
    }

    #[test]
    fn uncommanded_agents_hold_and_foreign_slots_are_discarded() {
        let mut queue = ActionQueue::new();
        queue.push(walk(5, 10));

        let report = queue.commit(&roster(3));
        assert_eq!(report.agents.len(), 3);
        assert!(report
            .agents
            .iter()
            .all(|agent| agent.order().command == Command::Hold));
        assert_eq!(report.discarded, vec![walk(5, 10)]);
    }

    #[test]
    fn assignment_tracks_queued_slots() {
        let mut queue = ActionQueue::new();
        assert!(!queue.is_assigned(0));
        queue.push(walk(0, 1).with_note("Farm"));
        assert!(queue.is_assigned(0));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.iter().next().and_then(|action| action.note), Some("Farm"));
    }
}
