use super::error::{ExecError, Result};

/// Single-slot return registers used by `@gosub`/`@return`.
///
/// Return points are signed: a call re-executed from a menu at index 0
/// records `-1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallRegisters {
    return_point: Option<isize>,
    deep_return_point: Option<isize>,
    from_sysmenu: bool,
    return_gui: Option<String>,
}

impl CallRegisters {
    /// Records `index` as the caller of an ordinary call.
    pub fn push_return_point(&mut self, index: usize) {
        self.return_point = Some(index as isize);
        self.from_sysmenu = false;
    }

    /// Records the command before `index`, so returning re-runs `index`.
    pub fn push_return_point_minus_one(&mut self, index: usize) {
        self.return_point = Some(index as isize - 1);
        self.from_sysmenu = true;
    }

    /// Records a return point for a menu call made while an ordinary call
    /// is still pending.
    pub fn set_deep_return_point(&mut self, point: isize) {
        self.deep_return_point = Some(point);
        self.from_sysmenu = true;
    }

    /// Takes the deep register if it is set, otherwise the primary one.
    pub fn pop_return_point(&mut self) -> Option<isize> {
        self.deep_return_point.take().or_else(|| self.return_point.take())
    }

    /// True once after a return from a menu-originated call.
    pub fn is_return_from_sysmenu_gosub(&mut self) -> bool {
        std::mem::take(&mut self.from_sysmenu)
    }

    pub fn push_return_gui(&mut self, name: impl Into<String>) {
        self.return_gui = Some(name.into());
    }

    /// One-shot: the second call returns `None`.
    pub fn get_return_gui(&mut self) -> Option<String> {
        self.return_gui.take()
    }

    pub fn get_return_point(&self) -> Option<isize> {
        self.return_point
    }

    /// Restores the primary register, checked against the script length.
    pub fn set_return_point(&mut self, point: Option<isize>, command_count: usize) -> Result<()> {
        if let Some(p) = point {
            if p < -1 || p >= command_count as isize {
                return Err(ExecError::IndexOutOfRange { index: p.max(0) as usize, len: command_count });
            }
        }
        self.return_point = point;
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
