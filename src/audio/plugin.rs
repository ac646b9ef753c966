//! Sound plugin - loads one clip per cue and plays them through kira.

use bevy::prelude::*;
use bevy_kira_audio::{
    Audio, AudioControl, AudioInstance, AudioPlugin, AudioSource, AudioTween, PlaybackState,
};
use kira::Volume;
use std::collections::HashMap;

use crate::core::{GameEvent, SimulationEvent, SoundCue};

/// Sound plugin - turns `GameEvent::Sound` into playing clips.
pub struct SoundPlugin;

impl Plugin for SoundPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(AudioPlugin)
            .init_resource::<SoundBank>()
            .add_systems(Startup, load_sound_bank)
            .add_systems(PostUpdate, play_sound_cues);
    }
}

/// Clip handles per cue and the most recent instance of each.
#[derive(Resource, Default)]
pub struct SoundBank {
    clips: HashMap<SoundCue, Handle<AudioSource>>,
    playing: HashMap<SoundCue, Handle<AudioInstance>>,
}

impl SoundBank {
    pub fn clip(&self, cue: SoundCue) -> Option<&Handle<AudioSource>> {
        self.clips.get(&cue)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

fn load_sound_bank(mut bank: ResMut<SoundBank>, asset_server: Res<AssetServer>) {
    for cue in SoundCue::ALL {
        bank.clips.insert(cue, asset_server.load(cue.asset_path()));
    }
    info!("Queued {} sound clips", bank.len());
}

fn is_playing(instances: &Assets<AudioInstance>, handle: &Handle<AudioInstance>) -> bool {
    instances
        .get(handle)
        .is_some_and(|instance| matches!(instance.state(), PlaybackState::Playing { .. }))
}

/// Exclusive cues wait for their last instance to finish. Other cues cut
/// the previous instance off and start again.
fn play_sound_cues(
    mut events: EventReader<SimulationEvent>,
    mut bank: ResMut<SoundBank>,
    audio: Res<Audio>,
    mut instances: ResMut<Assets<AudioInstance>>,
) {
    for SimulationEvent(event) in events.read() {
        let GameEvent::Sound(cue) = event else {
            continue;
        };
        let Some(clip) = bank.clip(*cue).cloned() else {
            continue;
        };

        if let Some(previous) = bank.playing.get(cue) {
            if cue.exclusive() && is_playing(&instances, previous) {
                continue;
            }
            if let Some(instance) = instances.get_mut(previous) {
                instance.stop(AudioTween::default());
            }
        }

        let handle = audio
            .play(clip)
            .with_volume(Volume::Decibels(cue.volume_db() as f64))
            .handle();
        bank.playing.insert(*cue, handle);
    }
}
