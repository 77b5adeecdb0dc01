// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::io;
use std::io::Write;
use std::sync::Arc;
use std::sync::Mutex;

use logplug::Level;
use logplug::backend::Json;
use logplug::backend::Text;
use rand::Rng;
use rand::distr::Alphanumeric;

// accepts at most one byte per call, so a line written by one thread would interleave with
// another's if the logger did not serialize them
#[derive(Clone, Default)]
struct TrickleWriter(Arc<Mutex<Vec<u8>>>);

impl TrickleWriter {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for TrickleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let Some(byte) = buf.first() else {
            return Ok(0);
        };
        self.0.lock().unwrap().push(*byte);
        std::thread::yield_now();
        Ok(1)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn random_payload(rng: &mut impl Rng) -> String {
    let len = rng.random_range(1..200);
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[test]
fn test_json_lines_never_interleave() {
    const THREADS: usize = 8;
    const MESSAGES: usize = 50;

    let writer = TrickleWriter::default();
    let logger = logplug::builder()
        .backend(Json::default().output(writer.clone()))
        .level(Level::Debug)
        .build()
        .unwrap();

    let sent = std::thread::scope(|s| {
        let handles = (0..THREADS)
            .map(|i| {
                let logger = &logger;
                s.spawn(move || {
                    let mut rng = rand::rng();
                    let mut sent = vec![];
                    for j in 0..MESSAGES {
                        let payload = format!("{i}-{j}-{}", random_payload(&mut rng));
                        let level = Level::ALL[rng.random_range(0..Level::ALL.len())];
                        logger.log(level, format_args!("{payload}"));
                        sent.push(payload);
                    }
                    sent
                })
            })
            .collect::<Vec<_>>();

        handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>()
    });
    logger.close().unwrap();

    let written = writer.contents();
    let mut received = written
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line)
                .unwrap_or_else(|err| panic!("line {line:?} is not valid json: {err}"));
            value["msg"].as_str().unwrap().to_string()
        })
        .collect::<Vec<_>>();

    let mut sent = sent;
    sent.sort();
    received.sort();
    assert_eq!(received, sent);
}

#[test]
fn test_text_lines_never_interleave() {
    let out = TrickleWriter::default();
    let err = TrickleWriter::default();
    let logger = logplug::builder()
        .backend(
            Text::default()
                .no_color()
                .output_routing(out.clone(), err.clone()),
        )
        .level(Level::Debug)
        .build()
        .unwrap();

    std::thread::scope(|s| {
        for i in 0..4 {
            let logger = &logger;
            s.spawn(move || {
                for j in 0..25 {
                    logplug::info!(logger, "info {i} {j} end");
                    logplug::error!(logger, "error {i} {j} end");
                }
            });
        }
    });

    for (contents, tag) in [(out.contents(), "[INFO] "), (err.contents(), "[ ERR] ")] {
        let lines = contents.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 100);
        for line in lines {
            assert!(line.starts_with(tag), "{line:?}");
            assert!(line.ends_with(" end"), "{line:?}");
        }
    }
}
