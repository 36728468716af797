use std::collections::HashMap;

use crate::common::control::{Binder, Binop, Control, Item, Unop};
use crate::common::data::{Closure, Data};
use crate::core;
use crate::vm::env::Environments;
use crate::vm::stack::{Slot, Stack};
use crate::vm::trace::Trace;

/// The CSE machine: a control stack of pending items, a value stack,
/// and the arena of environment frames. The control holds its next
/// item at the top, so loading a fragment pushes the fragment's
/// items in reverse.
pub struct Machine {
    control: Vec<Item>,
    stack: Stack,
    envs: Environments,
    current: usize,
    frags: Control,
    output: String,
}

impl Machine {
    /// Sets up the initial state: environment 0 holds the primitives,
    /// the stack holds its marker, and the control holds fragment 0
    /// guarded by the matching marker.
    pub fn init(frags: Control) -> Machine {
        let mut machine = Machine {
            control: vec![],
            stack: vec![Slot::Env(0)],
            envs: Environments::root(core::bindings()),
            current: 0,
            frags,
            output: String::new(),
        };

        machine.control.push(Item::Env(0));
        machine.load(0);
        machine
    }

    /// Steps until the control is exhausted;
    /// the single value left on the stack is the program's result.
    pub fn run(&mut self) -> Result<Data, Trace> {
        while let Some(item) = self.control.pop() {
            self.step(item)?;
        }

        match self.stack.pop() {
            Some(Slot::Data(result)) if self.stack.is_empty() => Ok(result),
            _ => Err(Trace::malformed(
                "the stack should hold exactly the result when control runs out",
            )),
        }
    }

    /// Everything `Print` wrote during the run.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_output(self) -> String {
        self.output
    }

    fn load(&mut self, frag: usize) {
        let items = self.frags.frag(frag).clone();
        self.control.extend(items.into_iter().rev());
    }

    fn push(&mut self, data: Data) {
        self.stack.push(Slot::Data(data));
    }

    fn pop(&mut self) -> Result<Data, Trace> {
        match self.stack.pop() {
            Some(Slot::Data(data)) => Ok(data),
            _ => Err(Trace::malformed("a value was expected on the stack")),
        }
    }

    fn step(&mut self, item: Item) -> Result<(), Trace> {
        match item {
            Item::Value(data) => self.push(data),

            Item::Lambda { frag, binder } => self.push(Data::Closure(Closure {
                frag,
                binder,
                env: self.current,
            })),

            Item::Name(name) => {
                let value = self
                    .envs
                    .lookup(self.current, &name.item)
                    .cloned()
                    .ok_or_else(|| Trace::unbound(&name.item, name.span.clone()))?;
                self.push(value);
            },

            Item::Gamma => {
                let rator = self.pop()?;
                let rand = self.pop()?;
                self.apply(rator, rand)?;
            },

            Item::Env(id) => self.exit(id)?,

            Item::Beta { then, other } => match self.pop()? {
                Data::Boolean(true) => self.load(then),
                Data::Boolean(false) => self.load(other),
                value => {
                    return Err(Trace::type_error(&format!(
                        "a conditional needs a truthvalue, found {}",
                        value
                    )))
                },
            },

            Item::Tau(n) => {
                let mut items = Vec::with_capacity(n);
                for _ in 0..n {
                    items.push(self.pop()?);
                }
                items.reverse();
                self.push(Data::Tuple(items));
            },

            Item::Aug => {
                let element = self.pop()?;
                let tuple = self.pop()?;
                self.push(core::tuple::aug(tuple, element));
            },

            Item::YStar => self.push(Data::YStar),

            Item::Binop(op) => {
                let right = self.pop()?;
                let left = self.pop()?;
                let result = match op {
                    Binop::Add => core::math::add(left, right)?,
                    Binop::Sub => core::math::sub(left, right)?,
                    Binop::Mul => core::math::mul(left, right)?,
                    Binop::Div => core::math::div(left, right)?,
                    Binop::Pow => core::math::pow(left, right)?,
                    Binop::Gr => core::logic::greater(left, right)?,
                    Binop::Ge => core::logic::greater_equal(left, right)?,
                    Binop::Ls => core::logic::less(left, right)?,
                    Binop::Le => core::logic::less_equal(left, right)?,
                    Binop::Eq => core::logic::equal(left, right),
                    Binop::Ne => core::logic::not_equal(left, right),
                    Binop::Or => core::logic::or(left, right)?,
                    Binop::And => core::logic::and(left, right)?,
                };
                self.push(result);
            },

            Item::Unop(op) => {
                let operand = self.pop()?;
                let result = match op {
                    Unop::Neg => core::math::neg(operand)?,
                    Unop::Not => core::logic::not(operand)?,
                };
                self.push(result);
            },
        }

        Ok(())
    }

    /// The `gamma` rule: dispatch on the rator.
    fn apply(&mut self, rator: Data, rand: Data) -> Result<(), Trace> {
        match rator {
            Data::Closure(closure) => self.enter(closure, rand),

            // tuples are functions from 1-based indices to elements
            Data::Tuple(items) => match rand {
                Data::Integer(i) if i >= 1 && (i as usize) <= items.len() => {
                    let index = (i - 1) as usize;
                    match items.into_iter().nth(index) {
                        Some(item) => {
                            self.push(item);
                            Ok(())
                        },
                        None => Err(Trace::malformed("a checked tuple index vanished")),
                    }
                },
                Data::Integer(i) => Err(Trace::out_of_bounds(&format!(
                    "index {} is outside the tuple's range 1..={}",
                    i,
                    items.len()
                ))),
                value => Err(Trace::type_error(&format!(
                    "a tuple is indexed by an integer, found {}",
                    value
                ))),
            },

            Data::Builtin { fun, mut args } => {
                args.push(rand);
                if args.len() < fun.arity() {
                    self.push(Data::Builtin { fun, args });
                    Ok(())
                } else {
                    let result = core::apply(fun, args, &mut self.output)?;
                    self.push(result);
                    Ok(())
                }
            },

            // unroll one step of the fixed point: the closure is applied
            // to the recursion node itself, then its result to the
            // original operand, so recursion needs no environment cycle
            Data::Eta(closure) => {
                self.push(rand);
                self.push(Data::Eta(closure.clone()));
                self.push(Data::Closure(closure));
                self.control.push(Item::Gamma);
                self.control.push(Item::Gamma);
                Ok(())
            },

            Data::YStar => match rand {
                Data::Closure(closure) => {
                    self.push(Data::Eta(closure));
                    Ok(())
                },
                value => Err(Trace::type_error(&format!(
                    "`Y*` fixes a lambda closure, found {}",
                    value
                ))),
            },

            value => Err(Trace::type_error(&format!("{} cannot be applied", value))),
        }
    }

    /// Applies a closure: builds the new frame per the binder shape,
    /// then runs the closure's fragment under an environment marker.
    fn enter(&mut self, closure: Closure, rand: Data) -> Result<(), Trace> {
        let mut bindings = HashMap::new();

        match closure.binder {
            Binder::Id(name) => {
                bindings.insert(name, rand);
            },
            Binder::Tuple(names) => match rand {
                Data::Tuple(items) if items.len() == names.len() => {
                    for (name, item) in names.into_iter().zip(items) {
                        bindings.insert(name, item);
                    }
                },
                Data::Tuple(items) => {
                    return Err(Trace::arity(&format!(
                        "a pattern of {} names cannot bind a tuple of {}",
                        names.len(),
                        items.len()
                    )))
                },
                value => {
                    return Err(Trace::type_error(&format!(
                        "a tuple pattern cannot bind {}",
                        value
                    )))
                },
            },
            Binder::Unit => match rand {
                Data::Dummy => (),
                value => {
                    return Err(Trace::type_error(&format!(
                        "`()` binds only dummy, found {}",
                        value
                    )))
                },
            },
        }

        let id = self.envs.push(closure.env, bindings);
        self.stack.push(Slot::Env(id));
        self.control.push(Item::Env(id));
        self.load(closure.frag);
        self.current = id;
        Ok(())
    }

    /// An environment marker came off the control: the fragment it
    /// guards is done. Its result hops over the matching stack
    /// marker, and the nearest marker still on the stack names the
    /// environment to resume.
    fn exit(&mut self, id: usize) -> Result<(), Trace> {
        let result = self.pop()?;

        match self.stack.pop() {
            Some(Slot::Env(marker)) if marker == id => (),
            _ => return Err(Trace::malformed("environment markers must nest")),
        }

        self.push(result);
        self.current = self
            .stack
            .iter()
            .rev()
            .find_map(|slot| match slot {
                Slot::Env(n) => Some(*n),
                _ => None,
            })
            .unwrap_or(0);
        Ok(())
    }
}
