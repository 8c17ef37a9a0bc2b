use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use tokio::sync::mpsc;

use super::AppState;
use crate::{
    app::events::AppEvent,
    domain::weather::{Condition, cycle_preset},
    fx::surface::Point,
    ui::{
        layout::sky_area,
        raster::{CELL_HEIGHT_PX, CELL_WIDTH_PX},
    },
};

impl AppState {
    pub(crate) async fn handle_input(
        &mut self,
        event: Event,
        tx: &mpsc::Sender<AppEvent>,
    ) -> Result<()> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key, tx).await?,
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                    self.pointer_at_cell(mouse.column, mouse.row);
                }
                _ => {}
            },
            Event::FocusLost => self.engine.pointer_left(),
            Event::Resize(cols, rows) => self.resize_viewport(cols, rows),
            _ => {}
        }
        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent, tx: &mpsc::Sender<AppEvent>) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            tx.send(AppEvent::Quit).await?;
            return Ok(());
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('q' | 'Q') => tx.send(AppEvent::Quit).await?,
            KeyCode::Left | KeyCode::Right => {
                let code = cycle_preset(self.condition.code, key.code == KeyCode::Right);
                self.set_manual_condition(Condition::new(code, self.condition.is_day));
            }
            KeyCode::Char('d' | 'D') => {
                self.set_manual_condition(Condition::new(
                    self.condition.code,
                    !self.condition.is_day,
                ));
            }
            KeyCode::Char(' ') => self.toggle_paused(),
            KeyCode::Char('r' | 'R') => self.start_fetch(tx).await?,
            _ => {}
        }
        Ok(())
    }

    /// Maps a terminal cell under the mouse to the center of its virtual pixels.
    fn pointer_at_cell(&mut self, column: u16, row: u16) {
        let sky = sky_area(self.viewport.0, self.viewport.1);
        if column < sky.left() || column >= sky.right() || row < sky.top() || row >= sky.bottom() {
            self.engine.pointer_left();
            return;
        }
        let x = (f32::from(column - sky.left()) + 0.5) * CELL_WIDTH_PX;
        let y = (f32::from(row - sky.top()) + 0.5) * CELL_HEIGHT_PX;
        self.engine.pointer_moved(Point::new(x, y));
    }
}
