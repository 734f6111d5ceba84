use bevy::prelude::*;
use ribbit_bits::{BitMessage, BitResult, RibbitMessage};

use crate::{BIT_MESSAGE_QUEUE, push_ribbit_message};

/// Native stand-in for the Ribbit host page.
///
/// `P` asks for parameters, `S` starts, `E` ends and `R` restarts the bit. What
/// the bit answers is logged.
pub struct RibbitSimulationPlugin;

impl Plugin for RibbitSimulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, request_parameters)
            .add_systems(Update, (simulate_ribbit_keys, log_bit_messages));
    }
}

fn request_parameters() {
    push_ribbit_message(RibbitMessage::Parameters);
}

fn key_message(keycode: &ButtonInput<KeyCode>) -> Option<(RibbitMessage, &'static str)> {
    if keycode.just_pressed(KeyCode::KeyP) {
        Some((RibbitMessage::Parameters, "parameters"))
    } else if keycode.just_pressed(KeyCode::KeyS) {
        Some((RibbitMessage::Start, "start"))
    } else if keycode.just_pressed(KeyCode::KeyE) {
        Some((RibbitMessage::End, "end"))
    } else if keycode.just_pressed(KeyCode::KeyR) {
        Some((RibbitMessage::Restart, "restart"))
    } else {
        None
    }
}

fn simulate_ribbit_keys(keycode: Option<Res<ButtonInput<KeyCode>>>) {
    let Some(keycode) = keycode else {
        return;
    };
    if let Some((message, name)) = key_message(&keycode) {
        info!("Simulating Ribbit {name}");
        push_ribbit_message(message);
    }
}

fn describe_result(result: &BitResult) -> String {
    match result {
        BitResult::LowestScore(score) | BitResult::HighestScore(score) => {
            format!("final score {score}")
        }
        BitResult::LongestDuration(duration) | BitResult::FastestDuration(duration) => {
            format!("time {:.1}s", duration.as_secs_f32())
        }
        BitResult::Success => "success".to_string(),
        BitResult::Failure => "failure".to_string(),
    }
}

fn log_bit_messages() {
    let messages: Vec<_> = BIT_MESSAGE_QUEUE.lock().drain(..).collect();
    for message in messages {
        match message {
            BitMessage::End(result) => info!("Bit ended: {}", describe_result(&result)),
            BitMessage::Parameters(parameters) => info!(
                "Bit parameters: duration {:.0}s",
                parameters.duration.get_duration().as_secs_f32()
            ),
            other => info!("Bit sent {other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_host_messages() {
        let mut keycode = ButtonInput::<KeyCode>::default();
        assert!(key_message(&keycode).is_none(), "no key, no message");

        keycode.press(KeyCode::KeyR);
        assert!(
            matches!(key_message(&keycode), Some((RibbitMessage::Restart, "restart"))),
            "R restarts"
        );

        keycode.clear();
        keycode.release(KeyCode::KeyR);
        keycode.press(KeyCode::KeyE);
        assert!(
            matches!(key_message(&keycode), Some((RibbitMessage::End, "end"))),
            "E ends"
        );
    }

    #[test]
    fn results_read_naturally() {
        assert_eq!(describe_result(&BitResult::Success), "success", "success");
        assert_eq!(describe_result(&BitResult::Failure), "failure", "failure");
    }
}
