//! Frame output for the runner.

use fungi_core::{Color, Location};
use fungi_world::Dish;

/// Something that can show the dish one point at a time
pub trait FrameSink {
    fn draw_point(&mut self, location: Location, color: Color);

    /// Called once every live fungus of the frame has been drawn
    fn present(&mut self);
}

/// Draw every live fungus and present the frame, returning how many points were drawn
pub fn draw_dish(dish: &Dish, sink: &mut impl FrameSink) -> usize {
    let mut points = 0;
    for fungus in dish.live_entities() {
        sink.draw_point(fungus.location(), fungus.color());
        points += 1;
    }
    sink.present();
    points
}

/// Sink that keeps frame counters instead of pixels
#[derive(Debug, Default)]
pub struct HeadlessFrames {
    pub frames: u64,
    pub points_in_frame: usize,
    pub last_frame_points: usize,
}

impl FrameSink for HeadlessFrames {
    fn draw_point(&mut self, _location: Location, _color: Color) {
        self.points_in_frame += 1;
    }

    fn present(&mut self) {
        self.frames += 1;
        self.last_frame_points = self.points_in_frame;
        self.points_in_frame = 0;
    }
}
