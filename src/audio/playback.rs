use rodio::{OutputStream, Sink, Source};

pub struct PlaybackEngine {
    sink: Sink,
}

impl PlaybackEngine {
    pub fn new(stream: &OutputStream) -> Self {
        Self {
            sink: Sink::connect_new(stream.mixer()),
        }
    }

    pub fn play_source<S>(&self, source: S)
    where
        S: Source + Send + 'static,
    {
        self.sink.append(source);
    }

    pub fn pause(&self) {
        self.sink.pause();
    }

    pub fn play(&self) {
        self.sink.play();
    }

    pub fn stop(&self) {
        self.sink.stop();
    }

    pub fn is_empty(&self) -> bool {
        self.sink.empty()
    }

    pub fn get_pos(&self) -> std::time::Duration {
        self.sink.get_pos()
    }

    pub fn try_seek(&self, pos: std::time::Duration) -> Result<(), rodio::source::SeekError> {
        self.sink.try_seek(pos)
    }
}
