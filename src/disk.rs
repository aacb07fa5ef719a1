// Disk controller boundary (88-DCDD style)
//
// The controller itself lives outside this crate; the bus only forwards the
// port traffic to it and never interprets the values.

pub trait DiskController {
    fn select(&mut self, value: u8);
    fn function(&mut self, value: u8);
    fn status(&mut self) -> u8;
    fn current_sector(&mut self) -> u8;
    fn read_byte(&mut self) -> u8;
    fn write_byte(&mut self, value: u8);
}

#[derive(Debug, Default)]
pub struct DiskProxy<D> {
    controller: D,
}

impl<D: DiskController> DiskProxy<D> {
    pub fn new(controller: D) -> Self {
        Self { controller }
    }

    pub fn select(&mut self, value: u8) {
        tracing::trace!("[DISK] Select {:02X}", value);
        self.controller.select(value);
    }

    pub fn function(&mut self, value: u8) {
        tracing::trace!("[DISK] Function {:02X}", value);
        self.controller.function(value);
    }

    pub fn status(&mut self) -> u8 {
        self.controller.status()
    }

    pub fn current_sector(&mut self) -> u8 {
        self.controller.current_sector()
    }

    pub fn read_byte(&mut self) -> u8 {
        self.controller.read_byte()
    }

    pub fn write_byte(&mut self, value: u8) {
        self.controller.write_byte(value);
    }

    pub fn controller(&self) -> &D {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut D {
        &mut self.controller
    }
}

/// A controller with no media in any drive. Every status bit is set (the
/// controller's active-low "nothing ready" pattern).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDisk;

impl DiskController for NoDisk {
    fn select(&mut self, _value: u8) {}

    fn function(&mut self, _value: u8) {}

    fn status(&mut self) -> u8 {
        0xFF
    }

    fn current_sector(&mut self) -> u8 {
        0
    }

    fn read_byte(&mut self) -> u8 {
        0
    }

    fn write_byte(&mut self, _value: u8) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(&'static str, u8)>,
        next: u8,
    }

    impl Recorder {
        fn answer(&mut self, op: &'static str) -> u8 {
            self.next = self.next.wrapping_add(0x11);
            self.calls.push((op, self.next));
            self.next
        }
    }

    impl DiskController for Recorder {
        fn select(&mut self, value: u8) {
            self.calls.push(("select", value));
        }

        fn function(&mut self, value: u8) {
            self.calls.push(("function", value));
        }

        fn status(&mut self) -> u8 {
            self.answer("status")
        }

        fn current_sector(&mut self) -> u8 {
            self.answer("sector")
        }

        fn read_byte(&mut self) -> u8 {
            self.answer("read")
        }

        fn write_byte(&mut self, value: u8) {
            self.calls.push(("write", value));
        }
    }

    #[test]
    fn test_proxy_passes_through() {
        let mut proxy = DiskProxy::new(Recorder::default());
        proxy.select(0x80);
        proxy.function(0x04);
        assert_eq!(proxy.status(), 0x11);
        assert_eq!(proxy.current_sector(), 0x22);
        assert_eq!(proxy.read_byte(), 0x33);
        proxy.write_byte(0xE5);

        assert_eq!(
            proxy.controller().calls,
            vec![
                ("select", 0x80),
                ("function", 0x04),
                ("status", 0x11),
                ("sector", 0x22),
                ("read", 0x33),
                ("write", 0xE5),
            ]
        );
    }

    #[test]
    fn test_no_disk() {
        let mut proxy = DiskProxy::new(NoDisk);
        proxy.select(0);
        assert_eq!(proxy.status(), 0xFF);
        assert_eq!(proxy.current_sector(), 0);
        assert_eq!(proxy.read_byte(), 0);
    }
}
