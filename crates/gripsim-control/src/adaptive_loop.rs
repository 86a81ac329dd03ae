// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The per-tick adaptive control state machine.
//!
//! Each tick the controller first applies whatever model responses arrived since
//! the previous tick, then decides whether to issue a new request, and finally
//! updates the idle logic of the [`DofStore`].

use std::time::Instant;

use gripsim_core::control::{ControlConfig, QueryState, TrackingMode};
use gripsim_core::input::{InputSnapshot, KeyBindings};
use gripsim_core::model::{DofQuery, DofUpdate, ProtocolError};

use crate::dof_store::DofStore;
use crate::matcher::match_dofs;

/// Asynchronous request/response transport as seen from the tick thread.
pub trait DofChannel {
    /// Issues a request. Must not block.
    fn submit(&mut self, query: DofQuery);

    /// Takes every result that arrived since the last call. Must not block.
    fn poll(&mut self) -> Vec<Result<DofUpdate, ProtocolError>>;

    /// Forgets every request issued so far. Their results are never returned by
    /// [`DofChannel::poll`], even if they complete later.
    fn discard_pending(&mut self);
}

/// Whether a DoF request is outstanding.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    /// No request outstanding; a new one may be issued.
    #[default]
    Idle,
    /// A request was issued and has not been accepted yet.
    InFlight,
}

/// Drives the [`DofStore`] from user input and model responses.
#[derive(Debug)]
pub struct AdaptiveController {
    store: DofStore,
    request: RequestState,
    last_sent: Option<DofQuery>,
    model: Option<String>,
}

impl AdaptiveController {
    /// Creates a controller configured by `config`.
    pub fn new(config: &ControlConfig, now: Instant) -> Self {
        Self {
            store: DofStore::new(config.axis_count, config.idle_threshold(), now),
            request: RequestState::Idle,
            last_sent: None,
            model: None,
        }
    }

    /// The DoF store.
    pub fn store(&self) -> &DofStore {
        &self.store
    }

    /// Mutable access to the DoF store, for the special DoF commands.
    pub fn store_mut(&mut self) -> &mut DofStore {
        &mut self.store
    }

    /// Current request state.
    pub fn request_state(&self) -> RequestState {
        self.request
    }

    /// The last query that was sent, if any.
    pub fn last_sent(&self) -> Option<&DofQuery> {
        self.last_sent.as_ref()
    }

    /// Model the requests are addressed to.
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Selects the model to query; `None` stops requesting.
    pub fn set_model(&mut self, model: Option<String>) {
        if self.model != model {
            log::info!("Adaptive model selected: {model:?}");
            self.model = model;
        }
    }

    /// Runs one control tick.
    ///
    /// `state` is the query state of the gripper at this tick.
    pub fn tick(
        &mut self,
        now: Instant,
        input: &InputSnapshot,
        bindings: &KeyBindings,
        config: &ControlConfig,
        state: QueryState,
        channel: &mut dyn DofChannel,
    ) {
        self.store.set_idle_threshold(config.idle_threshold());
        self.store.set_axis_count(config.axis_count, now);
        let active = input.any_adaptive_active(bindings, self.store.axis_count());

        // 1. Apply responses that arrived since the last tick.
        for result in channel.poll() {
            match result {
                Ok(update) => self.accept(update, active, config),
                Err(e) => log::warn!("DoF request failed, still waiting: {e}"),
            }
        }

        if !config.adaptive_enabled {
            return;
        }

        // 2. Issue a new request if the state changed.
        if self.request == RequestState::Idle {
            if let Some(model) = &self.model {
                let query = DofQuery {
                    model: model.clone(),
                    state,
                };
                if self.last_sent.as_ref() != Some(&query) {
                    log::trace!("Requesting DoFs for {query:?}");
                    self.last_sent = Some(query.clone());
                    self.request = RequestState::InFlight;
                    channel.submit(query);
                }
            }
        }

        // 3. Idle handling.
        if active {
            self.store.mark_active(now);
        } else {
            if config.tracking_mode == TrackingMode::HoldIdle {
                self.request = RequestState::Idle;
            }
            if config.auto_switch {
                self.store.rotate_chosen(false, now);
            }
        }
    }

    fn accept(&mut self, update: DofUpdate, active: bool, config: &ControlConfig) {
        if config.tracking_mode == TrackingMode::HoldIdle && active {
            log::debug!("DoF response discarded while adaptive input is active.");
            return;
        }
        let outcome = match_dofs(
            self.store.chosen(),
            self.store.dofs(),
            &update.dofs,
            config,
        );
        let rebind = (outcome.chosen != *self.store.chosen()).then_some(outcome.chosen);
        self.store.replace(outcome.dofs, update.eig_vals, rebind);
        self.request = RequestState::Idle;
        log::debug!(
            "DoF response applied, chosen {:?}, eigenvalues {:?}",
            self.store.chosen(),
            update.eig_vals
        );
    }
}
