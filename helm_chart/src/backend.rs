/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! the render backend seam. Whatever owns the graphics surface (window, framebuffer, textures)
//! implements [`RenderBackend`] - the chart only tells it which screen regions to restore from the
//! background image and which marker sprites to paint where.

use std::fmt;
use serde::{Serialize,Deserialize};

use crate::{projection::PixelRect, sprites::SpriteRef, errors::Result};

/// a single paint operation of a frame
#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Eq,Hash)]
pub enum RenderOp {
    /// restore the background image over `bounds`
    Erase { bounds: PixelRect },
    /// paint `sprite` into `bounds`
    Draw { bounds: PixelRect, sprite: SpriteRef },
}

impl RenderOp {
    pub fn bounds (&self)->&PixelRect {
        match self {
            RenderOp::Erase{bounds} => bounds,
            RenderOp::Draw{bounds,..} => bounds,
        }
    }

    pub fn is_erase (&self)->bool { matches!( self, RenderOp::Erase{..}) }
    pub fn is_draw (&self)->bool { matches!( self, RenderOp::Draw{..}) }
}

impl fmt::Display for RenderOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderOp::Erase{bounds} => write!( f, "erase {bounds}"),
            RenderOp::Draw{bounds,sprite} => write!( f, "draw {sprite} {bounds}"),
        }
    }
}

pub trait RenderBackend: Send {
    fn erase_region (&mut self, bounds: &PixelRect)->Result<()>;
    fn draw_marker (&mut self, sprite: &SpriteRef, bounds: &PixelRect)->Result<()>;

    /// make everything painted since the last call visible
    fn present (&mut self)->Result<()>;

    /// paint the whole background image, i.e. remove all markers
    fn repaint_background (&mut self)->Result<()>;

    fn apply (&mut self, op: &RenderOp)->Result<()> {
        match op {
            RenderOp::Erase{bounds} => self.erase_region( bounds),
            RenderOp::Draw{bounds,sprite} => self.draw_marker( sprite, bounds),
        }
    }
}

/// a backend that just keeps what was executed
#[derive(Debug,Default)]
pub struct RecordingBackend {
    pub ops: Vec<RenderOp>,
    pub presents: usize,
    pub background_repaints: usize,
}

impl RecordingBackend {
    pub fn new ()->Self { RecordingBackend::default() }

    /// return the ops recorded since the last call
    pub fn take_ops (&mut self)->Vec<RenderOp> {
        std::mem::take( &mut self.ops)
    }

    pub fn erased (&self)->impl Iterator<Item=&PixelRect> {
        self.ops.iter().filter_map( |op| if let RenderOp::Erase{bounds} = op { Some(bounds) } else { None })
    }

    pub fn drawn (&self)->impl Iterator<Item=(&SpriteRef,&PixelRect)> {
        self.ops.iter().filter_map( |op| if let RenderOp::Draw{bounds,sprite} = op { Some((sprite,bounds)) } else { None })
    }
}

impl RenderBackend for RecordingBackend {
    fn erase_region (&mut self, bounds: &PixelRect)->Result<()> {
        self.ops.push( RenderOp::Erase{ bounds: *bounds });
        Ok(())
    }

    fn draw_marker (&mut self, sprite: &SpriteRef, bounds: &PixelRect)->Result<()> {
        self.ops.push( RenderOp::Draw{ bounds: *bounds, sprite: *sprite });
        Ok(())
    }

    fn present (&mut self)->Result<()> {
        self.presents += 1;
        Ok(())
    }

    fn repaint_background (&mut self)->Result<()> {
        self.background_repaints += 1;
        Ok(())
    }
}
