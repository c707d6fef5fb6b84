//! Simulates a pointer gesture against the interaction session and
//! prints the effects the glue layer would carry out.
//!
//! Run with: cargo run -p fieldmark-core --example drag_session

use fieldmark_core::compositor::{build_scene, hit_test, BackgroundState, PageView};
use fieldmark_core::geometry::Point;
use fieldmark_core::interaction::{InputEvent, InteractionSession};
use fieldmark_core::model::TextField;

fn main() {
    let field = TextField::new("doc-1", "Tenant name");
    let view = PageView::new("doc-1", 612.0, 792.0, 0.5);
    let mut session = InteractionSession::new();
    session.set_scale(view.scale);

    let scene = build_scene(
        &view,
        std::slice::from_ref(&field),
        None,
        None,
        &BackgroundState::Pending,
    );

    // Click the field (screen coordinates at 50% zoom), then drag it by
    // (50, 50) on screen -- a 100-pixel move in document space.
    let press = Point::new(60.0, 55.0);
    let script = [
        InputEvent::PointerDown {
            target: hit_test(&scene, press),
            point: press,
        },
        InputEvent::PointerDown {
            target: hit_test(&scene, press),
            point: press,
        },
        InputEvent::PointerMove {
            point: Point::new(110.0, 105.0),
            touch_points: 1,
        },
        InputEvent::PointerUp,
    ];

    for event in script {
        println!("-> {:?}", event);
        for effect in session.handle_event(event) {
            println!("   {:?}", effect);
        }
    }
}
