use crate::action::{Action, ActionConfig};
use crate::error::{AmrError, Result};
use crate::preset::PresetCatalog;
use crate::registry;
use crate::types::ActionType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// The editable ordered sequence of actions a task is composed from.
/// Order is execution order. Action ids are unique within a workflow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Action>", into = "Vec<Action>")]
pub struct Workflow {
    actions: Vec<Action>,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an existing sequence, rejecting duplicate action ids.
    pub fn from_actions(actions: Vec<Action>) -> Result<Self> {
        let mut seen = HashSet::new();
        for action in &actions {
            if !seen.insert(action.id.as_str()) {
                return Err(AmrError::DuplicateActionId(action.id.clone()));
            }
        }
        Ok(Self { actions })
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Action> {
        self.actions.get(index)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.actions.len() {
            Ok(())
        } else {
            Err(AmrError::IndexOutOfRange {
                index,
                len: self.actions.len(),
            })
        }
    }

    /// Append a new action of the given type with a fresh id and empty
    /// config. Returns the index of the new action.
    pub fn add(&mut self, action_type: ActionType) -> usize {
        self.actions.push(Action::new(action_type));
        self.actions.len() - 1
    }

    /// Move the action at `from` so it ends up at position `to`.
    ///
    /// Semantics are remove-then-insert into the already-shortened
    /// sequence, which is what a drag hover expects frame by frame, not a
    /// swap. `from == to` is a no-op.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from == to {
            return Ok(());
        }
        let action = self.actions.remove(from);
        self.actions.insert(to, action);
        Ok(())
    }

    /// Remove and return the action at `index`.
    pub fn remove(&mut self, index: usize) -> Result<Action> {
        self.check_index(index)?;
        Ok(self.actions.remove(index))
    }

    /// Replace the configuration of the action at `index` wholesale.
    pub fn update_config(&mut self, index: usize, config: ActionConfig) -> Result<()> {
        self.check_index(index)?;
        self.actions[index].config = config;
        Ok(())
    }

    /// Replace the action at `index`, keeping its position.
    pub fn replace(&mut self, index: usize, action: Action) -> Result<()> {
        self.check_index(index)?;
        self.actions[index] = action;
        Ok(())
    }

    /// A workflow may be submitted once it is non-empty and every action
    /// satisfies its type's validity predicate.
    pub fn is_submittable(&self) -> bool {
        !self.actions.is_empty()
            && self
                .actions
                .iter()
                .all(|a| registry::is_valid(a.action_type, &a.config))
    }

    /// Like `is_submittable`, but reports the first failure.
    pub fn validate(&self) -> Result<()> {
        if self.actions.is_empty() {
            return Err(AmrError::EmptyWorkflow);
        }
        for action in &self.actions {
            registry::validate(action.action_type, &action.config)?;
        }
        Ok(())
    }
}

impl TryFrom<Vec<Action>> for Workflow {
    type Error = AmrError;

    fn try_from(actions: Vec<Action>) -> Result<Self> {
        Workflow::from_actions(actions)
    }
}

impl From<Workflow> for Vec<Action> {
    fn from(workflow: Workflow) -> Self {
        workflow.actions
    }
}

// ---------------------------------------------------------------------------
// Composer
// ---------------------------------------------------------------------------

/// A workflow under edit plus the caller-held selection.
///
/// The selection is recomputed on every mutation rather than left to
/// drift: adding selects the new action, moving follows the moved action
/// to its target position, removing clears the selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Composer {
    pub workflow: Workflow,
    #[serde(default)]
    pub selected: Option<usize>,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_action(&self) -> Option<&Action> {
        self.selected.and_then(|i| self.workflow.get(i))
    }

    pub fn select(&mut self, index: usize) -> Result<()> {
        if index >= self.workflow.len() {
            return Err(AmrError::IndexOutOfRange {
                index,
                len: self.workflow.len(),
            });
        }
        self.selected = Some(index);
        Ok(())
    }

    pub fn add(&mut self, action_type: ActionType) -> usize {
        let index = self.workflow.add(action_type);
        self.selected = Some(index);
        index
    }

    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        self.workflow.move_item(from, to)?;
        self.selected = Some(to);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Action> {
        let removed = self.workflow.remove(index)?;
        self.selected = None;
        Ok(removed)
    }

    pub fn update_config(&mut self, index: usize, config: ActionConfig) -> Result<()> {
        self.workflow.update_config(index, config)
    }

    /// Merge a named preset into the action at `index`. The action is
    /// replaced only when the preset exists; an unknown name leaves the
    /// workflow untouched.
    pub fn apply_preset(
        &mut self,
        index: usize,
        catalog: &PresetCatalog,
        preset_name: &str,
    ) -> Result<()> {
        let action = self
            .workflow
            .get(index)
            .ok_or(AmrError::IndexOutOfRange {
                index,
                len: self.workflow.len(),
            })?;
        let merged = catalog.apply(action, preset_name)?;
        self.workflow.replace(index, merged)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
