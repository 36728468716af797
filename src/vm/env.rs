use std::collections::HashMap;

use crate::common::data::Data;

/// One environment frame: the bindings introduced by a single
/// application, plus the frame they extend. Frames are frozen once
/// pushed; application only ever adds new frames.
#[derive(Debug)]
pub struct Frame {
    parent: Option<usize>,
    bindings: HashMap<String, Data>,
}

/// All environment frames, in an append-only arena indexed by id.
/// Closures and the machine stack refer to frames by id, so no
/// heap-managed parent pointers (or cycles) are needed.
#[derive(Debug)]
pub struct Environments {
    frames: Vec<Frame>,
}

impl Environments {
    /// Starts the arena with environment 0, the primitive bindings.
    pub fn root(bindings: HashMap<String, Data>) -> Environments {
        Environments {
            frames: vec![Frame {
                parent: None,
                bindings,
            }],
        }
    }

    /// Pushes a new frame extending `parent`, returning its id.
    pub fn push(&mut self, parent: usize, bindings: HashMap<String, Data>) -> usize {
        self.frames.push(Frame {
            parent: Some(parent),
            bindings,
        });
        self.frames.len() - 1
    }

    /// Walks the parent chain from `env`; the innermost binding wins.
    pub fn lookup(&self, env: usize, name: &str) -> Option<&Data> {
        let mut current = env;
        loop {
            let frame = &self.frames[current];
            if let Some(value) = frame.bindings.get(name) {
                return Some(value);
            }
            current = frame.parent?;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn frame(pairs: &[(&str, i64)]) -> HashMap<String, Data> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), Data::Integer(*value)))
            .collect()
    }

    #[test]
    fn inner_bindings_shadow_outer() {
        let mut envs = Environments::root(frame(&[("x", 1), ("y", 2)]));
        let inner = envs.push(0, frame(&[("x", 10)]));

        assert_eq!(envs.lookup(inner, "x"), Some(&Data::Integer(10)));
        assert_eq!(envs.lookup(inner, "y"), Some(&Data::Integer(2)));
        assert_eq!(envs.lookup(0, "x"), Some(&Data::Integer(1)));
        assert_eq!(envs.lookup(inner, "z"), None);
    }

    #[test]
    fn sibling_frames_are_independent() {
        let mut envs = Environments::root(frame(&[]));
        let left = envs.push(0, frame(&[("x", 1)]));
        let right = envs.push(0, frame(&[("x", 2)]));

        assert_eq!(envs.lookup(left, "x"), Some(&Data::Integer(1)));
        assert_eq!(envs.lookup(right, "x"), Some(&Data::Integer(2)));
    }
}
