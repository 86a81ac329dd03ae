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

//! The simulation: scene construction, per-tick update, commands and drawing.

use std::time::Instant;

use gripsim_control::DofChannel;
use gripsim_core::control::GripperState;
use gripsim_core::draw::Canvas;
use gripsim_core::input::{
    Command, GamepadSnapshot, InputEvent, InputSnapshot, KeyBindings, KeyboardState,
};
use gripsim_core::math::{Vec2, TAU};
use gripsim_core::physics::{BodyHandle, PhysicsError, PhysicsProvider};
use gripsim_core::recording::{annotate_comment, RecordingEvent};
use gripsim_infra::RapierPhysicsWorld;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::config::SimConfig;
use crate::entities::{add_walls, GraspBox, Gripper, RecordingCamera, SimBody, Target};
use crate::overlay::{draw_dofs, draw_fps, draw_stopped, FpsCounter, GripperPose};

/// Builds a fresh physics world for every scene.
pub type PhysicsFactory = Box<dyn Fn() -> Box<dyn PhysicsProvider>>;

/// Comment stored when a recording is stopped without one.
const EMPTY_COMMENT: &str = "(no comment)";

/// Box sizes in pixels, in state order.
const BOX_SIZES: [Vec2; 2] = [Vec2::new(20.0, 20.0), Vec2::new(30.0, 30.0)];

/// Errors raised while running the simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The physics provider rejected an operation.
    #[error(transparent)]
    Physics(#[from] PhysicsError),
}

/// A uniformly random point in the middle three fifths of each canvas axis.
pub fn random_position<R: Rng>(rng: &mut R, canvas: Vec2) -> Vec2 {
    fn axis<R: Rng>(rng: &mut R, length: f32) -> f32 {
        let offset = length / 5.0;
        offset + rng.gen::<f32>() * (length - 2.0 * offset)
    }
    let x = axis(rng, canvas.x);
    let y = axis(rng, canvas.y);
    Vec2::new(x, y)
}

/// A uniformly random orientation in `[0, 2π)`.
pub fn random_angle<R: Rng>(rng: &mut R) -> f32 {
    rng.gen::<f32>() * TAU
}

/// One scene: a physics world and everything living in it.
struct Scene {
    physics: Box<dyn PhysicsProvider>,
    ground: BodyHandle,
    walls: [SimBody; 4],
    target: Target,
    gripper: Gripper,
    boxes: [GraspBox; 2],
}

impl Scene {
    fn build(
        mut physics: Box<dyn PhysicsProvider>,
        rng: &mut StdRng,
        config: &SimConfig,
        poles: bool,
        now: Instant,
    ) -> Result<Self, PhysicsError> {
        let canvas = config.simulation.canvas_size();
        physics.set_gravity(Vec2::ZERO);
        let ground = physics.add_ground();
        let walls = add_walls(physics.as_mut(), canvas);

        let target = Target::new(random_position(rng, canvas));
        let position = random_position(rng, canvas);
        let angle = random_angle(rng);
        let gripper = Gripper::spawn(physics.as_mut(), position, angle, &config.control, now)?;

        let mut spawn_box = |size: Vec2| {
            let position = random_position(rng, canvas);
            let angle = random_angle(rng);
            GraspBox::spawn(physics.as_mut(), ground, position, angle, size, poles)
        };
        let boxes = [spawn_box(BOX_SIZES[0])?, spawn_box(BOX_SIZES[1])?];

        Ok(Self {
            physics,
            ground,
            walls,
            target,
            gripper,
            boxes,
        })
    }
}

/// The gripper simulation.
///
/// Drive it with [`Simulation::handle_event`] for input, [`Simulation::update`]
/// once per tick and [`Simulation::draw`] once per frame.
pub struct Simulation {
    config: SimConfig,
    bindings: KeyBindings,
    physics_factory: PhysicsFactory,
    rng: StdRng,
    scene: Scene,
    camera: RecordingCamera,
    channel: Box<dyn DofChannel>,
    recorder: flume::Sender<RecordingEvent>,
    confirmation: Option<flume::Receiver<String>>,
    model: Option<String>,
    keys: KeyboardState,
    focused: bool,
    gamepad: Option<GamepadSnapshot>,
    parked_gamepad: Option<GamepadSnapshot>,
    previous_buttons: Vec<bool>,
    poles: bool,
    recording: bool,
    recording_comment: String,
    hud_visible: bool,
    running: bool,
    fps: FpsCounter,
}

impl Simulation {
    /// Creates a simulation on a `rapier2d` world.
    ///
    /// `channel` carries DoF queries to the model; `recorder` receives the
    /// recording events.
    pub fn new(
        config: SimConfig,
        channel: Box<dyn DofChannel>,
        recorder: flume::Sender<RecordingEvent>,
    ) -> Result<Self, SimulationError> {
        let factory: PhysicsFactory = Box::new(|| Box::new(RapierPhysicsWorld::new()));
        Self::with_physics(config, channel, recorder, factory)
    }

    /// Creates a simulation on worlds built by `physics_factory`.
    pub fn with_physics(
        config: SimConfig,
        channel: Box<dyn DofChannel>,
        recorder: flume::Sender<RecordingEvent>,
        physics_factory: PhysicsFactory,
    ) -> Result<Self, SimulationError> {
        let now = Instant::now();
        let mut rng = match config.simulation.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let poles = config.simulation.poles;
        let scene = Scene::build(physics_factory(), &mut rng, &config, poles, now)?;
        log::info!(
            "Simulation set up on a {}x{} canvas at {} fps.",
            config.simulation.width,
            config.simulation.height,
            config.simulation.fps
        );
        Ok(Self {
            hud_visible: config.simulation.hud,
            config,
            bindings: KeyBindings::default(),
            physics_factory,
            rng,
            scene,
            camera: RecordingCamera::new(),
            channel,
            recorder,
            confirmation: None,
            model: None,
            keys: KeyboardState::default(),
            focused: true,
            gamepad: None,
            parked_gamepad: None,
            previous_buttons: Vec::new(),
            poles,
            recording: false,
            recording_comment: String::new(),
            running: true,
            fps: FpsCounter::new(now),
        })
    }

    // --- Accessors ---

    /// The active configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Mutable configuration. Control settings take effect on the next tick.
    pub fn config_mut(&mut self) -> &mut SimConfig {
        &mut self.config
    }

    /// Key layout.
    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Mutable key layout.
    pub fn bindings_mut(&mut self) -> &mut KeyBindings {
        &mut self.bindings
    }

    /// The gripper of the current scene.
    pub fn gripper(&self) -> &Gripper {
        &self.scene.gripper
    }

    /// Mutable access to the gripper of the current scene.
    pub fn gripper_mut(&mut self) -> &mut Gripper {
        &mut self.scene.gripper
    }

    /// The two boxes of the current scene.
    pub fn boxes(&self) -> &[GraspBox; 2] {
        &self.scene.boxes
    }

    /// The target of the current scene.
    pub fn target(&self) -> &Target {
        &self.scene.target
    }

    /// The walls of the current scene.
    pub fn walls(&self) -> &[SimBody; 4] {
        &self.scene.walls
    }

    /// Static body the boxes rub against.
    pub fn ground(&self) -> BodyHandle {
        self.scene.ground
    }

    /// The physics world of the current scene.
    pub fn physics(&self) -> &dyn PhysicsProvider {
        self.scene.physics.as_ref()
    }

    /// The recording camera.
    pub fn camera(&self) -> &RecordingCamera {
        &self.camera
    }

    /// Keys currently held.
    pub fn keys(&self) -> &KeyboardState {
        &self.keys
    }

    /// Returns `false` once the simulation has been stopped.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Returns `true` while recording.
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Returns `true` if the boxes carry poles.
    pub fn poles(&self) -> bool {
        self.poles
    }

    /// Returns `true` if the DoF overlay is drawn.
    pub fn hud_visible(&self) -> bool {
        self.hud_visible
    }

    /// The model queried for DoFs.
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Selects the model queried for DoFs. Kept across restarts.
    pub fn select_model(&mut self, model: Option<String>) {
        self.scene.gripper.controller_mut().set_model(model.clone());
        self.model = model;
    }

    /// Comment attached to recordings stopped by a key or button.
    pub fn set_recording_comment(&mut self, comment: impl Into<String>) {
        self.recording_comment = comment.into();
    }

    /// The scene as seen from the gripper.
    pub fn gripper_state(&self) -> Result<GripperState, PhysicsError> {
        let physics = self.scene.physics.as_ref();
        let [a, b] = &self.scene.boxes;
        let boxes = [a.body().pose(physics)?, b.body().pose(physics)?];
        self.scene
            .gripper
            .state(physics, self.scene.target.position, boxes)
    }

    // --- Input ---

    /// Applies one input event. Special keys run their command on press.
    pub fn handle_event(
        &mut self,
        event: InputEvent,
        now: Instant,
    ) -> Result<(), SimulationError> {
        match event {
            InputEvent::KeyPressed { key } => {
                let command = Command::from_key(&key);
                if self.keys.press(key) {
                    if let Some(command) = command {
                        self.execute(command, now)?;
                    }
                }
            }
            InputEvent::KeyReleased { key } => self.keys.release(&key),
            InputEvent::FocusLost => {
                log::debug!("Focus lost, releasing all keys.");
                self.focused = false;
                self.keys.clear();
                self.parked_gamepad = self.gamepad.take();
            }
            InputEvent::FocusGained => {
                self.focused = true;
                if let Some(pad) = self.parked_gamepad.take() {
                    self.gamepad = Some(pad);
                }
            }
            InputEvent::Gamepad(snapshot) => {
                if snapshot.is_none() {
                    self.previous_buttons.clear();
                }
                if self.focused {
                    self.gamepad = snapshot;
                } else {
                    self.parked_gamepad = snapshot;
                }
            }
        }
        Ok(())
    }

    /// Runs a discrete command.
    pub fn execute(&mut self, command: Command, now: Instant) -> Result<(), SimulationError> {
        log::debug!("Command {:?}", command);
        match command {
            Command::Stop => self.stop(),
            Command::ToggleHud => self.hud_visible = !self.hud_visible,
            Command::Restart => self.restart(now)?,
            Command::PrintState => {
                let state = self.gripper_state()?;
                log::info!("Gripper state: {:?}", state.to_array());
            }
            Command::ResetDofs => self
                .scene
                .gripper
                .controller_mut()
                .store_mut()
                .reset_canonical(now),
            Command::AdvanceDofs => self.scene.gripper.controller_mut().store_mut().advance(now),
            Command::ToggleRecording => self.toggle_recording(),
        }
        Ok(())
    }

    /// Edge-triggered gamepad buttons.
    fn gamepad_commands(&mut self) -> Vec<Command> {
        let Some(pad) = &self.gamepad else {
            return Vec::new();
        };
        let commands = [Command::RESTART_BUTTON, Command::RECORD_BUTTON]
            .into_iter()
            .filter(|&button| {
                let was_pressed = self.previous_buttons.get(button).copied().unwrap_or(false);
                pad.is_pressed(button) && !was_pressed
            })
            .filter_map(Command::from_button)
            .collect();
        self.previous_buttons = pad.buttons.iter().map(|b| b.pressed).collect();
        commands
    }

    fn input_snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            keys: self.keys.clone(),
            gamepad: self.gamepad.as_ref().map(GamepadSnapshot::control_vector),
        }
    }

    // --- Lifecycle ---

    /// Stops the simulation. Further updates do nothing.
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Simulation stopped.");
        }
        self.running = false;
    }

    /// Rebuilds the scene at new random positions and tells the recorder.
    pub fn restart(&mut self, now: Instant) -> Result<(), SimulationError> {
        log::info!("Restarting simulation.");
        let physics = (self.physics_factory)();
        self.scene = Scene::build(physics, &mut self.rng, &self.config, self.poles, now)?;
        self.channel.discard_pending();
        self.scene
            .gripper
            .controller_mut()
            .set_model(self.model.clone());
        self.camera.count_restart();
        self.publish(RecordingEvent::RestartingSimulation);
        Ok(())
    }

    /// Advances the simulation by one tick of `dt` seconds.
    pub fn update(&mut self, now: Instant, dt: f32) -> Result<(), SimulationError> {
        if !self.running {
            return Ok(());
        }
        if let Some(rx) = &self.confirmation {
            if let Ok(message) = rx.try_recv() {
                log::info!("{message}");
                self.confirmation = None;
            }
        }

        for command in self.gamepad_commands() {
            self.execute(command, now)?;
        }

        let input = self.input_snapshot();
        let query = self.gripper_state()?.query_state();
        self.scene.gripper.update(
            self.scene.physics.as_mut(),
            now,
            &input,
            &self.bindings,
            &self.config.control,
            &self.config.gripper,
            query,
            self.channel.as_mut(),
        )?;

        let state = self.gripper_state()?;
        self.camera.update(self.recording, &state, &self.recorder);

        let physics = self.scene.physics.as_mut();
        physics.step(dt);
        let canvas = self.config.simulation.canvas_size();
        self.scene.gripper.body().return_to_view(physics, canvas)?;
        for grasp_box in &self.scene.boxes {
            grasp_box.body().return_to_view(physics, canvas)?;
        }
        Ok(())
    }

    // --- Scene options ---

    /// Adds or removes the poles. Refused while recording.
    ///
    /// Returns `true` if the request was applied.
    pub fn set_poles(&mut self, enabled: bool) -> Result<bool, SimulationError> {
        if self.recording {
            log::warn!("Poles cannot be toggled while recording.");
            return Ok(false);
        }
        for grasp_box in &mut self.scene.boxes {
            grasp_box.set_pole(self.scene.physics.as_mut(), enabled)?;
        }
        self.poles = enabled;
        Ok(true)
    }

    /// Flips the poles. Refused while recording.
    pub fn toggle_poles(&mut self) -> Result<bool, SimulationError> {
        self.set_poles(!self.poles)
    }

    // --- Recording ---

    fn publish(&self, event: RecordingEvent) {
        if self.recorder.send(event).is_err() {
            log::debug!("No recorder attached, event dropped.");
        }
    }

    /// Opens a new recording.
    pub fn start_recording(&mut self) {
        if self.recording {
            return;
        }
        log::info!("Recording started.");
        self.recording = true;
        self.publish(RecordingEvent::StartRecording);
    }

    /// Closes the recording with `comment`, annotated with the pole setting.
    ///
    /// Returns the channel the confirmation will arrive on, or `None` if nothing
    /// was being recorded.
    pub fn stop_recording(&mut self, comment: &str) -> Option<flume::Receiver<String>> {
        if !self.recording {
            return None;
        }
        let comment = if comment.trim().is_empty() {
            log::warn!("Recording stopped without a comment.");
            EMPTY_COMMENT
        } else {
            comment
        };
        self.recording = false;
        let (reply, confirmation) = flume::bounded(1);
        self.publish(RecordingEvent::StopRecording {
            comment: annotate_comment(comment, self.poles),
            reply: Some(reply),
        });
        log::info!("Recording stopped.");
        Some(confirmation)
    }

    /// Starts or stops recording; a stop uses the preset comment.
    pub fn toggle_recording(&mut self) {
        if self.recording {
            let comment = self.recording_comment.clone();
            self.confirmation = self.stop_recording(&comment);
        } else {
            self.start_recording();
        }
    }

    // --- Drawing ---

    fn gripper_pose(&self) -> Result<GripperPose, PhysicsError> {
        let physics = self.scene.physics.as_ref();
        let gripper = &self.scene.gripper;
        let [left, right] = gripper.fingers();
        Ok(GripperPose {
            palm: gripper.body().pose(physics)?,
            finger_max_y: [left.max_y(), right.max_y()],
            fingers: [left.body().pose(physics)?, right.body().pose(physics)?],
            finger_directions: [left.direction(), right.direction()],
        })
    }

    /// Draws one frame.
    pub fn draw<C: Canvas>(
        &mut self,
        canvas: &mut C,
        now: Instant,
    ) -> Result<(), SimulationError> {
        canvas.clear();
        let physics = self.scene.physics.as_ref();
        self.scene.target.draw(canvas);
        self.scene.gripper.draw(physics, canvas)?;
        for grasp_box in &self.scene.boxes {
            grasp_box.draw(physics, canvas)?;
        }
        self.camera.draw(self.recording, canvas);

        if self.config.control.adaptive_enabled && self.hud_visible {
            let store = self.scene.gripper.controller().store();
            draw_dofs(
                canvas,
                &self.gripper_pose()?,
                store.dofs(),
                store.eig_vals(),
                store.chosen(),
                &self.config.gripper,
            );
        }

        let fps = self.fps.tick(now);
        draw_fps(canvas, fps);
        if !self.running {
            draw_stopped(canvas);
        }
        Ok(())
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("running", &self.running)
            .field("recording", &self.recording)
            .field("poles", &self.poles)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}
