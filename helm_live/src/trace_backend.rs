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

use tracing::{debug,info,trace};
use helm_chart::{backend::RenderBackend, projection::PixelRect, sprites::SpriteRef, errors::Result};

/// a render backend without a screen, which just logs what it is asked to paint. Use
/// RUST_LOG=helm_live=trace to see single ops
#[derive(Debug,Default)]
pub struct TraceBackend {
    frame: u64,
    erased: usize,
    drawn: usize,
}

impl TraceBackend {
    pub fn new ()->Self { TraceBackend::default() }
}

impl RenderBackend for TraceBackend {
    fn erase_region (&mut self, bounds: &PixelRect)->Result<()> {
        trace!("frame {}: erase {bounds}", self.frame);
        self.erased += 1;
        Ok(())
    }

    fn draw_marker (&mut self, sprite: &SpriteRef, bounds: &PixelRect)->Result<()> {
        trace!("frame {}: draw {sprite} at {bounds}", self.frame);
        self.drawn += 1;
        Ok(())
    }

    fn present (&mut self)->Result<()> {
        if self.erased + self.drawn > 0 {
            debug!( erased = self.erased, drawn = self.drawn, "present frame {}", self.frame);
        }
        self.frame += 1;
        self.erased = 0;
        self.drawn = 0;
        Ok(())
    }

    fn repaint_background (&mut self)->Result<()> {
        info!("frame {}: repaint background", self.frame);
        Ok(())
    }
}
