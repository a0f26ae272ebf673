fn main() {
    bevy_music::game::run();
}
