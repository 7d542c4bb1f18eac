//! An 80x25 text-mode character display with a hardware cursor and control
//! registers. Only the byte grid and registers are modeled here; rendering
//! the grid to a terminal is the driver's job, not this device's.

/// Columns per row.
pub const COLS: usize = 80;
/// Rows in the visible grid.
pub const ROWS: usize = 25;

/// Newline: move to column 0 of the next row.
const CHAR_LF: u8 = 0x0A;
/// Carriage return: move to column 0 of the current row.
const CHAR_CR: u8 = 0x0D;
/// Backspace: move back one column and blank the cell there.
const CHAR_BS: u8 = 0x08;
/// Tab: advance to the next column that is a multiple of four.
const CHAR_TAB: u8 = 0x09;

/// Control register offset, relative to the display control base: the
/// visible-page index. Stored but never used to select among buffers —
/// the display has a single visible grid regardless of the written value.
const CTRL_PAGE: u32 = 0x00;
/// Control register offset: cursor column, taken modulo [`COLS`].
const CTRL_CURSOR_X: u32 = 0x01;
/// Control register offset: cursor row, taken modulo [`ROWS`].
const CTRL_CURSOR_Y: u32 = 0x02;
/// Control register offset: an opaque display mode value.
const CTRL_MODE: u32 = 0x03;
/// Control register offset: auto-scroll enable, any non-zero value is `true`.
const CTRL_SCROLL: u32 = 0x04;
/// Control register offset: writing any value clears the grid.
const CTRL_CLEAR: u32 = 0x05;

/// The text-mode display device.
#[derive(Clone, Debug)]
pub struct Display {
    buffer: [u8; COLS * ROWS],
    cursor_x: usize,
    cursor_y: usize,
    current_page: u8,
    mode: u32,
    auto_scroll: bool,
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

impl Display {
    /// Creates a blank display with the cursor homed at `(0, 0)` and
    /// auto-scroll enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: [b' '; COLS * ROWS],
            cursor_x: 0,
            cursor_y: 0,
            current_page: 0,
            mode: 0,
            auto_scroll: true,
        }
    }

    /// A read-only view of the character grid, row-major, `ROWS * COLS` bytes.
    #[must_use]
    pub fn buffer(&self) -> &[u8; COLS * ROWS] {
        &self.buffer
    }

    /// The cursor's current `(column, row)`.
    #[must_use]
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_x, self.cursor_y)
    }

    /// The last value written to `CTRL_PAGE`, masked to 4 bits. Does not
    /// select among distinct framebuffers; the display has only one grid.
    #[must_use]
    pub fn current_page(&self) -> u8 {
        self.current_page
    }

    /// The last value written to `CTRL_MODE`, stored raw.
    #[must_use]
    pub fn mode(&self) -> u32 {
        self.mode
    }

    /// Whether `write_at_cursor` scrolls the grid when the cursor advances
    /// past the last row, instead of pinning it at the last row.
    #[must_use]
    pub fn auto_scroll(&self) -> bool {
        self.auto_scroll
    }

    /// Writes `byte` directly into the grid at `(x, y)`, without moving the
    /// cursor or interpreting control codes.
    ///
    /// A `byte` value of zero is silently dropped rather than blanking the
    /// cell: a word-granularity MMIO write that only touches some of its
    /// four character positions must not blank the ones it left zero.
    pub fn write_char(&mut self, x: usize, y: usize, byte: u8) {
        if byte == 0 {
            return;
        }
        if x < COLS && y < ROWS {
            self.buffer[y * COLS + x] = byte;
        }
    }

    /// Writes `byte` at the cursor, interpreting control codes and
    /// advancing (and wrapping/scrolling) the cursor for printable bytes.
    pub fn write_at_cursor(&mut self, byte: u8) {
        match byte {
            CHAR_LF => {
                self.cursor_y += 1;
                self.cursor_x = 0;
            }
            CHAR_CR => self.cursor_x = 0,
            CHAR_BS => {
                if self.cursor_x > 0 {
                    self.cursor_x -= 1;
                    self.write_char(self.cursor_x, self.cursor_y, b' ');
                }
            }
            CHAR_TAB => {
                let next = (self.cursor_x / 4 + 1) * 4;
                self.cursor_x = next.min(COLS);
            }
            0x20..=0x7E => {
                self.write_char(self.cursor_x, self.cursor_y, byte);
                self.cursor_x += 1;
                if self.cursor_x >= COLS {
                    self.cursor_x = 0;
                    self.cursor_y += 1;
                }
            }
            _ => {}
        }

        if self.cursor_y >= ROWS {
            if self.auto_scroll {
                self.scroll_up();
            } else {
                self.cursor_y = ROWS - 1;
            }
        }
    }

    /// Shifts every row up by one, discarding row 0 and blanking the new
    /// last row, and re-homes the cursor to the last row.
    pub fn scroll_up(&mut self) {
        self.buffer.copy_within(COLS.., 0);
        self.buffer[(ROWS - 1) * COLS..].fill(b' ');
        self.cursor_y = ROWS - 1;
    }

    /// Blanks the grid and homes the cursor to `(0, 0)`.
    pub fn clear(&mut self) {
        self.buffer.fill(b' ');
        self.cursor_x = 0;
        self.cursor_y = 0;
    }

    /// Moves the cursor to `(x, y)`. Each axis is updated independently and
    /// only if it already falls in range; an out-of-range axis is left
    /// untouched rather than clamped. This is the programmatic API; the
    /// `CURSOR_X`/`CURSOR_Y` control registers use modulo wraparound
    /// instead (see `write_control`).
    pub fn set_cursor(&mut self, x: u32, y: u32) {
        if (x as usize) < COLS {
            self.cursor_x = x as usize;
        }
        if (y as usize) < ROWS {
            self.cursor_y = y as usize;
        }
    }

    /// Dispatches a write to the control register at byte `offset` from the
    /// display control base address.
    pub fn write_control(&mut self, offset: u32, value: u32) {
        match offset {
            CTRL_PAGE => self.current_page = (value & 0x0F) as u8,
            CTRL_CURSOR_X => self.cursor_x = (value as usize) % COLS,
            CTRL_CURSOR_Y => self.cursor_y = (value as usize) % ROWS,
            CTRL_MODE => self.mode = value,
            CTRL_SCROLL => self.auto_scroll = value != 0,
            CTRL_CLEAR => self.clear(),
            _ => {}
        }
    }
}
