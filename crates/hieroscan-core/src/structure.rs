//! Block structure of an inscription and its Unicode serialization.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use crate::controls::{
    BEGIN, BEGIN_ENCL, CART_CLOSE, CART_OPEN, END, END_ENCL, HOR, M, N33, N33A, N35, N35A, V10,
    VER, Z1, Z2, Z3, Z4A,
};
use crate::font::Corner;

/// A node of the layout tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Structure {
    /// A single sign, possibly with smaller groups inserted at its corners.
    Basic {
        sign: char,
        corners: BTreeMap<Corner, Structure>,
    },
    /// Groups side by side, in reading order.
    Horizontal(Vec<Structure>),
    /// Groups stacked from top to bottom.
    Vertical(Vec<Structure>),
    /// Groups enclosed in a cartouche.
    Cartouche(Vec<Structure>),
}

impl Structure {
    /// A sign without insertions.
    pub fn sign(sign: char) -> Self {
        Structure::Basic {
            sign,
            corners: BTreeMap::new(),
        }
    }

    /// Does this node carry corner insertions?
    pub fn has_insertions(&self) -> bool {
        matches!(self, Structure::Basic { corners, .. } if !corners.is_empty())
    }

    fn plain_sign(&self) -> Option<char> {
        match self {
            Structure::Basic { sign, corners } if corners.is_empty() => Some(*sign),
            _ => None,
        }
    }

    /// Render as a string of sign code points and format controls.
    pub fn to_unicode(&self) -> String {
        let mut out = String::new();
        self.write_unicode(&mut out);
        out
    }

    fn write_unicode(&self, out: &mut String) {
        match self {
            Structure::Basic { sign, corners } => {
                out.push(*sign);
                for (corner, child) in corners {
                    out.push(corner.control());
                    if child.plain_sign().is_some() {
                        child.write_unicode(out);
                    } else {
                        out.push(BEGIN);
                        child.write_unicode(out);
                        out.push(END);
                    }
                }
            }
            Structure::Horizontal(children) => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        out.push(HOR);
                    }
                    if matches!(child, Structure::Vertical(_)) {
                        out.push(BEGIN);
                        child.write_unicode(out);
                        out.push(END);
                    } else {
                        child.write_unicode(out);
                    }
                }
            }
            Structure::Vertical(children) => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        out.push(VER);
                    }
                    child.write_unicode(out);
                }
            }
            Structure::Cartouche(children) => {
                out.push(CART_OPEN);
                out.push(BEGIN_ENCL);
                for child in children {
                    child.write_unicode(out);
                }
                out.push(END_ENCL);
                out.push(CART_CLOSE);
            }
        }
    }

    /// Fold ligatures and detect cartouches, bottom up.
    ///
    /// Runs of identical insertion-free signs are replaced by their joined
    /// forms. A horizontal or vertical group left with a single member is
    /// replaced by that member.
    pub fn normalize(&self) -> Structure {
        match self {
            Structure::Basic { sign, corners } => {
                let corners: BTreeMap<Corner, Structure> = corners
                    .iter()
                    .map(|(corner, child)| (*corner, child.normalize()))
                    .collect();
                if *sign == V10 {
                    if let Some(Structure::Horizontal(children)) = corners.get(&Corner::Middle) {
                        return Structure::Cartouche(children.clone());
                    }
                }
                Structure::Basic {
                    sign: *sign,
                    corners,
                }
            }
            Structure::Horizontal(children) => {
                let mut normals: Vec<Structure> = children.iter().map(Structure::normalize).collect();
                normals = fold_runs(normals, N33, 3, N33A);
                normals = fold_runs(normals, Z1, 3, Z2);
                normals = fold_runs(normals, Z1, 2, Z4A);
                collapse(normals, Structure::Horizontal)
            }
            Structure::Vertical(children) => {
                let mut normals: Vec<Structure> = children.iter().map(Structure::normalize).collect();
                normals = fold_runs(normals, N35, 3, N35A);
                normals = fold_runs(normals, Z1, 3, Z3);
                collapse(normals, Structure::Vertical)
            }
            Structure::Cartouche(children) => {
                Structure::Cartouche(children.iter().map(Structure::normalize).collect())
            }
        }
    }
}

/// Replace each run of `len` consecutive plain `unit` signs by `joint`,
/// scanning left to right.
fn fold_runs(groups: Vec<Structure>, unit: char, len: usize, joint: char) -> Vec<Structure> {
    let mut pending: VecDeque<Structure> = groups.into();
    let mut out = Vec::with_capacity(pending.len());
    while !pending.is_empty() {
        let run = pending.len() >= len
            && pending
                .iter()
                .take(len)
                .all(|g| g.plain_sign() == Some(unit));
        if run {
            pending.drain(..len);
            out.push(Structure::sign(joint));
        } else if let Some(group) = pending.pop_front() {
            out.push(group);
        }
    }
    out
}

fn collapse(mut groups: Vec<Structure>, wrap: fn(Vec<Structure>) -> Structure) -> Structure {
    if groups.len() == 1 {
        if let Some(only) = groups.pop() {
            return only;
        }
    }
    wrap(groups)
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_unicode())
    }
}
