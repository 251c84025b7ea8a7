/// User intents accepted by the playback controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    TogglePlaying,
    SetPlaying(bool),
    SeekToIndex(usize),
    SliderDrag(f32),
    SeekCommit,
    SeekToStart,
    Like(bool),
    Dislike(bool),
    Share,
}
